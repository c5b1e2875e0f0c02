//! PHP source templates for module artifacts
//!
//! Rendered with handlebars, HTML escaping disabled.

/// Validated data object
pub const DATA_TEMPLATE: &str = r"<?php

declare(strict_types=1);

namespace {{namespace}};

use Spatie\LaravelData\Data;
use Spatie\LaravelData\Attributes\Validation\Min;

class {{class_name}} extends Data
{
    public function __construct(
        public ?int $id,
        #[Min(3)]
        public string $name,
    ) {}
}
";

/// Readonly data-transfer object
pub const DTO_TEMPLATE: &str = r"<?php

declare(strict_types=1);

namespace {{namespace}};

class {{class_name}}
{
    public function __construct(
        public readonly int $id,
        public readonly string $name,
    ) {}
}
";

/// Create-table migration
pub const CREATE_MIGRATION_TEMPLATE: &str = r"<?php

declare(strict_types=1);

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\Schema;

return new class extends Migration
{
    public function up()
    {
        Schema::create('{{table}}', function (Blueprint $table) {
            $table->id();
            $table->string('name');
            $table->timestamps();
        });
    }

    public function down()
    {
        Schema::dropIfExists('{{table}}');
    }
};
";

/// Table-modifying migration
///
/// `up_statements` and `down_statements` arrive pre-indented, one per line.
pub const MODIFY_MIGRATION_TEMPLATE: &str = r"<?php

declare(strict_types=1);

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\Schema;

return new class extends Migration
{
    public function up()
    {
        Schema::table('{{table}}', function (Blueprint $table) {
{{up_statements}}
        });
    }

    public function down()
    {
        Schema::table('{{table}}', function (Blueprint $table) {
{{down_statements}}
        });
    }
};
";

/// Eloquent model
pub const MODEL_TEMPLATE: &str = r"<?php

declare(strict_types=1);

namespace {{namespace}};

use Illuminate\Database\Eloquent\Model;

class {{class_name}} extends Model
{
    protected $table = '{{table}}';

    protected $fillable = ['name'];

}
";

/// Repository contract
pub const CONTRACT_TEMPLATE: &str = r"<?php

declare(strict_types=1);

namespace {{namespace}};

interface {{class_name}}
{

}
";

/// Repository implementation
pub const REPOSITORY_TEMPLATE: &str = r"<?php

declare(strict_types=1);

namespace {{namespace}};

use {{contract_class}};
use {{model_class}};

class {{class_name}} implements {{contract_name}}
{
    public function __construct(
        protected {{model_name}} ${{variable}}Model
    ) {}

}
";

/// Application service
pub const SERVICE_TEMPLATE: &str = r"<?php

declare(strict_types=1);

namespace {{namespace}};

use {{contract_class}};

class {{class_name}}
{
    public function __construct(
        protected {{contract_name}} ${{variable}}Repository
    ) {}
}
";

/// HTTP controller
pub const CONTROLLER_TEMPLATE: &str = r"<?php

declare(strict_types=1);

namespace {{namespace}};

use App\Http\Controllers\Controller;
use {{service_class}};

class {{class_name}} extends Controller
{

    public function __construct(
        protected {{service_name}} ${{variable}}Service
    ) {}

}
";

/// Form request with DTO conversion
pub const REQUEST_TEMPLATE: &str = r"<?php

declare(strict_types=1);

namespace {{namespace}};

use Illuminate\Foundation\Http\FormRequest;
use {{dto_class}};

class {{class_name}} extends FormRequest
{
    public function authorize()
    {
        return true;
    }

    public function rules()
    {
        return [
            'name' => 'required|string|max:255',
        ];
    }

    public function toDTO(): {{dto_name}}
    {
        return new {{dto_name}}(
            id: $this->input('id', 0),
            name: $this->input('name'),
        );
    }
}
";

/// JSON resource
pub const RESOURCE_TEMPLATE: &str = r"<?php

declare(strict_types=1);

namespace {{namespace}};

use Illuminate\Contracts\Support\Arrayable;
use Illuminate\Http\Request;
use Illuminate\Http\Resources\Json\JsonResource;
use JsonSerializable;

class {{class_name}} extends JsonResource
{
    public function toArray(Request $request) : array|Arrayable|JsonSerializable
    {
        return parent::toArray($request);
    }
}
";

/// Module route file
pub const ROUTE_TEMPLATE: &str = r"<?php

use Illuminate\Support\Facades\Route;

Route::prefix('{{route_prefix}}')->name('{{route_prefix}}.')->group(function () {
    //
});
";

/// Database seeder
pub const SEEDER_TEMPLATE: &str = r"<?php

declare(strict_types=1);

namespace {{namespace}};

use Illuminate\Database\Seeder;

class {{class_name}} extends Seeder
{
    public function run(): void
    {
        //
    }
}
";
