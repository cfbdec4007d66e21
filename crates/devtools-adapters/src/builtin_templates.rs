//! Built-in project skeletons.
//!
//! One [`Template`] per [`Flavor`]. Each skeleton carries every optional file
//! (both `config.ini` and `config.php`, `.phtml` and `.volt` views, webtools
//! entry points); [`Template::select`] drops the ones the project options do
//! not ask for.
//!
//! Rendering replaces only known variables, so Volt's `{{ content() }}`
//! passes through parameterized views untouched.

use devtools_core::{
    domain::{
        DirectorySpec, FileSpec, Flavor, RelativePath, Template, TemplateContent,
        TemplateMetadata, TemplateNode, TemplateSource, TemplateTree, registry::find_flavor,
    },
    error::DevtoolsResult,
};
use tracing::instrument;

/// Every built-in skeleton, in [`Flavor::ALL`] order.
#[instrument]
pub fn all_templates() -> DevtoolsResult<Vec<Template>> {
    Flavor::ALL.into_iter().map(skeleton).collect()
}

/// The built-in skeleton for one flavor.
pub fn skeleton(flavor: Flavor) -> DevtoolsResult<Template> {
    let description = find_flavor(flavor)
        .map(|def| def.description)
        .unwrap_or_default();

    let tree = match flavor {
        Flavor::Cli => cli_tree(),
        Flavor::Micro => micro_tree(),
        Flavor::Simple => simple_tree(),
        Flavor::Modules => modules_tree(),
    };

    let template = Template::builder()
        .flavor(flavor)
        .metadata(
            TemplateMetadata::new(format!("{flavor} project"))
                .description(description)
                .version(devtools_core::VERSION),
        )
        .tree(tree)
        .build()?;
    Ok(template)
}

// ── Node helpers ──────────────────────────────────────────────────────────────

fn dir(path: impl Into<RelativePath>) -> TemplateNode {
    TemplateNode::Directory(DirectorySpec::new(path))
}

fn literal(path: impl Into<RelativePath>, content: &'static str) -> TemplateNode {
    TemplateNode::File(FileSpec::new(
        path,
        TemplateContent::Literal(TemplateSource::Static(content)),
    ))
}

fn param(path: impl Into<RelativePath>, content: &'static str) -> TemplateNode {
    TemplateNode::File(FileSpec::new(
        path,
        TemplateContent::Parameterized(TemplateSource::Static(content)),
    ))
}

/// Marker, config pair and loader shared by every flavor.
fn common(tree: &mut TemplateTree, models_dir: &'static str) {
    tree.push(dir(".phalcon"));
    tree.push(dir("app/config"));
    tree.push(dir(models_dir));
    tree.push(param("app/config/config.ini", CONFIG_INI));
    tree.push(param("app/config/config.php", CONFIG_PHP));
    tree.push(param("app/config/loader.php", LOADER_PHP));
}

/// Rewrite rules, dev-server router and webtools entry points.
fn web(tree: &mut TemplateTree) {
    tree.push(dir("public"));
    tree.push(literal(".htaccess", ROOT_HTACCESS));
    tree.push(literal(".htrouter.php", HTROUTER_PHP));
    tree.push(literal("public/.htaccess", PUBLIC_HTACCESS));
    tree.push(param("public/webtools.php", WEBTOOLS_PHP));
    tree.push(param("public/webtools.config.php", WEBTOOLS_CONFIG_PHP));
}

/// Layout and `index/index` views in both engines under `views_dir`.
fn views(tree: &mut TemplateTree, views_dir: &str) {
    let at = |rel: &str| RelativePath::new(format!("{views_dir}/{rel}"));

    tree.push(dir(at("index")));
    tree.push(param(at("index.phtml"), LAYOUT_PHTML));
    tree.push(param(at("index.volt"), LAYOUT_VOLT));
    tree.push(param(at("index/index.phtml"), INDEX_PHTML));
    tree.push(param(at("index/index.volt"), INDEX_VOLT));
}

// ── Flavors ───────────────────────────────────────────────────────────────────

fn cli_tree() -> TemplateTree {
    let mut tree = TemplateTree::new();
    common(&mut tree, "app/models");
    tree.push(param("app/config/services.php", CLI_SERVICES_PHP));
    tree.push(dir("app/tasks"));
    tree.push(literal("app/tasks/MainTask.php", CLI_MAIN_TASK));
    tree.push(param("app/bootstrap.php", CLI_BOOTSTRAP));
    tree.push(TemplateNode::File(
        FileSpec::new(
            "run",
            TemplateContent::Literal(TemplateSource::Static(CLI_RUN)),
        )
        .executable(),
    ));
    tree
}

fn micro_tree() -> TemplateTree {
    let mut tree = TemplateTree::new();
    common(&mut tree, "app/models");
    web(&mut tree);
    tree.push(param("app/config/services.php", SERVICES_PHP));
    tree.push(dir("app/views"));
    tree.push(literal("app/views/index.phtml", MICRO_INDEX_PHTML));
    tree.push(literal("app/views/index.volt", MICRO_INDEX_VOLT));
    tree.push(param("app/app.php", MICRO_APP));
    tree.push(param("public/index.php", MICRO_PUBLIC_INDEX));
    tree
}

fn simple_tree() -> TemplateTree {
    let mut tree = TemplateTree::new();
    common(&mut tree, "app/models");
    web(&mut tree);
    tree.push(param("app/config/services.php", SERVICES_PHP));
    tree.push(param("app/config/router.php", ROUTER_PHP));
    tree.push(dir("app/controllers"));
    tree.push(literal("app/controllers/ControllerBase.php", CONTROLLER_BASE));
    tree.push(literal("app/controllers/IndexController.php", INDEX_CONTROLLER));
    tree.push(dir("app/migrations"));
    views(&mut tree, "app/views");
    tree.push(param("public/index.php", SIMPLE_PUBLIC_INDEX));
    tree
}

fn modules_tree() -> TemplateTree {
    let mut tree = TemplateTree::new();
    common(&mut tree, "apps/frontend/models");
    web(&mut tree);
    tree.push(param("app/config/services.php", SERVICES_PHP));
    tree.push(param("app/config/modules.php", MODULES_PHP));
    tree.push(dir("apps/frontend/controllers"));
    tree.push(param("apps/frontend/Module.php", FRONTEND_MODULE));
    tree.push(param(
        "apps/frontend/controllers/ControllerBase.php",
        FRONTEND_CONTROLLER_BASE,
    ));
    tree.push(param(
        "apps/frontend/controllers/IndexController.php",
        FRONTEND_INDEX_CONTROLLER,
    ));
    views(&mut tree, "apps/frontend/views");
    tree.push(param("public/index.php", MODULES_PUBLIC_INDEX));
    tree
}

// ── Shared sources ────────────────────────────────────────────────────────────

const CONFIG_INI: &str = r#"[database]
adapter  = Mysql
host     = localhost
username = root
password = secret
dbname   = {{PROJECT_NAME_SNAKE}}
charset  = utf8

[application]
appDir         = app/
controllersDir = app/controllers/
modelsDir      = {{MODELS_DIR}}/
migrationsDir  = app/migrations/
viewsDir       = app/views/
pluginsDir     = app/plugins/
libraryDir     = app/library/
cacheDir       = app/cache/
baseUri        = /{{PROJECT_NAME_KEBAB}}/
"#;

const CONFIG_PHP: &str = r#"<?php

defined('BASE_PATH') || define('BASE_PATH', getenv('BASE_PATH') ?: realpath(dirname(__FILE__) . '/../..'));
defined('APP_PATH') || define('APP_PATH', BASE_PATH . '/app');

return new \Phalcon\Config([
    'database' => [
        'adapter'  => 'Mysql',
        'host'     => 'localhost',
        'username' => 'root',
        'password' => 'secret',
        'dbname'   => '{{PROJECT_NAME_SNAKE}}',
        'charset'  => 'utf8',
    ],
    'application' => [
        'appDir'         => APP_PATH . '/',
        'controllersDir' => APP_PATH . '/controllers/',
        'modelsDir'      => BASE_PATH . '/{{MODELS_DIR}}/',
        'migrationsDir'  => APP_PATH . '/migrations/',
        'viewsDir'       => APP_PATH . '/views/',
        'pluginsDir'     => APP_PATH . '/plugins/',
        'libraryDir'     => APP_PATH . '/library/',
        'cacheDir'       => BASE_PATH . '/cache/',
        'baseUri'        => '/{{PROJECT_NAME_KEBAB}}/',
    ]
]);
"#;

const LOADER_PHP: &str = r#"<?php

$loader = new \Phalcon\Loader();

$loader->registerDirs(
    [
        $config->application->controllersDir,
        $config->application->modelsDir
    ]
)->register();
"#;

const SERVICES_PHP: &str = r#"<?php

use Phalcon\Mvc\View;
use Phalcon\Mvc\View\Engine\Php as PhpEngine;
use Phalcon\Mvc\Url as UrlResolver;
use Phalcon\Mvc\View\Engine\Volt as VoltEngine;
use Phalcon\Session\Adapter\Files as SessionAdapter;

$di->setShared('config', function () {
    $file = APP_PATH . '/config/{{CONFIG_FILE}}';
    return substr($file, -4) === '.ini'
        ? new \Phalcon\Config\Adapter\Ini($file)
        : include $file;
});

$di->setShared('url', function () {
    $url = new UrlResolver();
    $url->setBaseUri($this->getConfig()->application->baseUri);
    return $url;
});

$di->setShared('view', function () {
    $view = new View();
    $view->setViewsDir($this->getConfig()->application->viewsDir);
    $view->registerEngines([
        '.volt'  => function ($view) {
            $volt = new VoltEngine($view, $this);
            $volt->setOptions(['compiledPath' => $this->getConfig()->application->cacheDir]);
            return $volt;
        },
        '.phtml' => PhpEngine::class
    ]);
    return $view;
});

$di->setShared('db', function () {
    $config = $this->getConfig();
    $class = 'Phalcon\Db\Adapter\Pdo\\' . $config->database->adapter;
    $params = $config->database->toArray();
    unset($params['adapter']);
    return new $class($params);
});

$di->setShared('session', function () {
    $session = new SessionAdapter();
    $session->start();
    return $session;
});
"#;

const ROUTER_PHP: &str = r#"<?php

$router = $di->getRouter();

// Define your routes here

$router->handle();
"#;

const ROOT_HTACCESS: &str = r#"<IfModule mod_rewrite.c>
    RewriteEngine on
    RewriteRule  ^$ public/    [L]
    RewriteRule  ((?s).*) public/$1 [L]
</IfModule>
"#;

const PUBLIC_HTACCESS: &str = r#"AddDefaultCharset UTF-8

<IfModule mod_rewrite.c>
    RewriteEngine On
    RewriteCond %{REQUEST_FILENAME} !-d
    RewriteCond %{REQUEST_FILENAME} !-f
    RewriteRule ^((?s).*)$ index.php?_url=/$1 [QSA,L]
</IfModule>
"#;

const HTROUTER_PHP: &str = r#"<?php

$uri = urldecode(parse_url($_SERVER['REQUEST_URI'], PHP_URL_PATH));

if ($uri !== '/' && file_exists(__DIR__ . '/public' . $uri)) {
    return false;
}

$_GET['_url'] = $_SERVER['REQUEST_URI'];

require_once __DIR__ . '/public/index.php';
"#;

const WEBTOOLS_PHP: &str = r#"<?php

/**
 * WebTools entry point for {{PROJECT_NAME}}.
 * Remove this file before deploying to production.
 */

require_once __DIR__ . '/webtools.config.php';
require_once PTOOLSPATH . '/bootstrap/autoload.php';

$bootstrap = new Phalcon\Web\Tools\Library\Bootstrap([
    'ptools_path' => PTOOLSPATH,
    'ptools_ip'   => PTOOLS_IP,
    'base_path'   => BASE_PATH,
]);

echo $bootstrap->run();
"#;

const WEBTOOLS_CONFIG_PHP: &str = r#"<?php

defined('BASE_PATH') || define('BASE_PATH', dirname(__DIR__));
defined('PTOOLSPATH') || define('PTOOLSPATH', getenv('PTOOLSPATH') ?: '/usr/local/share/devtools');
defined('PTOOLS_IP') || define('PTOOLS_IP', '127.0.0.1');
defined('ENV_PRODUCTION') || define('ENV_PRODUCTION', 'production');
defined('APPLICATION_ENV') || define('APPLICATION_ENV', getenv('APPLICATION_ENV') ?: 'development');
"#;

const LAYOUT_PHTML: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <meta charset="utf-8">
        <title>{{PROJECT_NAME}}</title>
    </head>
    <body>
        <div class="container">
            <?php echo $this->getContent(); ?>
        </div>
    </body>
</html>
"#;

const LAYOUT_VOLT: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <meta charset="utf-8">
        <title>{{PROJECT_NAME}}</title>
    </head>
    <body>
        <div class="container">
            {{ content() }}
        </div>
    </body>
</html>
"#;

const INDEX_PHTML: &str = r#"<div class="page-header">
    <h1>Congratulations!</h1>
</div>

<p>You're now flying with {{PROJECT_NAME}}. Great things are about to happen!</p>
"#;

const INDEX_VOLT: &str = r#"<div class="page-header">
    <h1>Congratulations!</h1>
</div>

<p>You're now flying with {{PROJECT_NAME}}. Great things are about to happen!</p>
<p>This page is located at <code>views/index/index.volt</code></p>
"#;

// ── simple ────────────────────────────────────────────────────────────────────

const CONTROLLER_BASE: &str = r#"<?php

use Phalcon\Mvc\Controller;

class ControllerBase extends Controller
{
}
"#;

const INDEX_CONTROLLER: &str = r#"<?php

class IndexController extends ControllerBase
{
    public function indexAction()
    {
    }
}
"#;

const SIMPLE_PUBLIC_INDEX: &str = r#"<?php

use Phalcon\Di\FactoryDefault;

error_reporting(E_ALL);

define('BASE_PATH', dirname(__DIR__));
define('APP_PATH', BASE_PATH . '/app');

try {
    $di = new FactoryDefault();

    include APP_PATH . '/config/services.php';
    include APP_PATH . '/config/router.php';

    $config = $di->getConfig();

    include APP_PATH . '/config/loader.php';

    $application = new \Phalcon\Mvc\Application($di);

    echo str_replace(["\n", "\r", "\t"], '', $application->handle()->getContent());
} catch (\Exception $e) {
    echo $e->getMessage() . '<br>';
    echo '<pre>' . $e->getTraceAsString() . '</pre>';
}
"#;

// ── micro ─────────────────────────────────────────────────────────────────────

const MICRO_APP: &str = r#"<?php

/**
 * Routes for {{PROJECT_NAME}}.
 */

$app->get('/', function () {
    echo $this['view']->render('index');
});

$app->notFound(function () use ($app) {
    $app->response->setStatusCode(404, "Not Found")->sendHeaders();
    echo $app['view']->render('404');
});
"#;

const MICRO_INDEX_PHTML: &str = r#"<div class="page-header">
    <h1>Congratulations!</h1>
</div>

<p>You're now flying with a micro application.</p>
"#;

const MICRO_INDEX_VOLT: &str = r#"<div class="page-header">
    <h1>Congratulations!</h1>
</div>

<p>You're now flying with a micro application. Rendered by {{ "Volt" }}.</p>
"#;

const MICRO_PUBLIC_INDEX: &str = r#"<?php

use Phalcon\Di\FactoryDefault;
use Phalcon\Mvc\Micro;

error_reporting(E_ALL);

define('BASE_PATH', dirname(__DIR__));
define('APP_PATH', BASE_PATH . '/app');

try {
    $di = new FactoryDefault();

    include APP_PATH . '/config/services.php';

    $config = $di->getConfig();

    include APP_PATH . '/config/loader.php';

    $app = new Micro($di);

    include APP_PATH . '/app.php';

    $app->handle();
} catch (\Exception $e) {
    echo $e->getMessage() . '<br>';
    echo '<pre>' . $e->getTraceAsString() . '</pre>';
}
"#;

// ── cli ───────────────────────────────────────────────────────────────────────

const CLI_SERVICES_PHP: &str = r#"<?php

$di->setShared('config', function () {
    $file = APP_PATH . '/config/{{CONFIG_FILE}}';
    return substr($file, -4) === '.ini'
        ? new \Phalcon\Config\Adapter\Ini($file)
        : include $file;
});

$di->setShared('db', function () {
    $config = $this->getConfig();
    $class = 'Phalcon\Db\Adapter\Pdo\\' . $config->database->adapter;
    $params = $config->database->toArray();
    unset($params['adapter']);
    return new $class($params);
});
"#;

const CLI_MAIN_TASK: &str = r#"<?php

class MainTask extends \Phalcon\Cli\Task
{
    public function mainAction()
    {
        echo "Congratulations! You are now flying with a CLI application." . PHP_EOL;
    }
}
"#;

const CLI_BOOTSTRAP: &str = r#"<?php

use Phalcon\Di\FactoryDefault\Cli as CliDI;
use Phalcon\Cli\Console as ConsoleApp;

define('BASE_PATH', dirname(__DIR__));
define('APP_PATH', BASE_PATH . '/app');

$di = new CliDI();

include APP_PATH . '/config/services.php';

$config = $di->getConfig();

include APP_PATH . '/config/loader.php';

$console = new ConsoleApp($di);

$arguments = [];
foreach ($argv as $k => $arg) {
    if ($k === 1) {
        $arguments['task'] = $arg;
    } elseif ($k === 2) {
        $arguments['action'] = $arg;
    } elseif ($k >= 3) {
        $arguments['params'][] = $arg;
    }
}

try {
    $console->handle($arguments);
} catch (\Throwable $throwable) {
    fwrite(STDERR, $throwable->getMessage() . PHP_EOL);
    exit(1);
}
"#;

const CLI_RUN: &str = r#"#!/usr/bin/env sh
exec php "$(dirname "$0")/app/bootstrap.php" "$@"
"#;

// ── modules ───────────────────────────────────────────────────────────────────

const MODULES_PHP: &str = r#"<?php

$application->registerModules([
    'frontend' => [
        'className' => '{{PROJECT_NAME_PASCAL}}\Modules\Frontend\Module',
        'path'      => BASE_PATH . '/apps/frontend/Module.php'
    ]
]);
"#;

const FRONTEND_MODULE: &str = r#"<?php

namespace {{PROJECT_NAME_PASCAL}}\Modules\Frontend;

use Phalcon\DiInterface;
use Phalcon\Loader;
use Phalcon\Mvc\View;
use Phalcon\Mvc\ModuleDefinitionInterface;

class Module implements ModuleDefinitionInterface
{
    public function registerAutoloaders(DiInterface $di = null)
    {
        $loader = new Loader();
        $loader->registerNamespaces([
            '{{PROJECT_NAME_PASCAL}}\Modules\Frontend\Controllers' => __DIR__ . '/controllers/',
            '{{PROJECT_NAME_PASCAL}}\Modules\Frontend\Models'      => __DIR__ . '/models/',
        ]);
        $loader->register();
    }

    public function registerServices(DiInterface $di)
    {
        $di->set('view', function () {
            $view = new View();
            $view->setViewsDir(__DIR__ . '/views/');
            return $view;
        });
    }
}
"#;

const FRONTEND_CONTROLLER_BASE: &str = r#"<?php

namespace {{PROJECT_NAME_PASCAL}}\Modules\Frontend\Controllers;

use Phalcon\Mvc\Controller;

class ControllerBase extends Controller
{
}
"#;

const FRONTEND_INDEX_CONTROLLER: &str = r#"<?php

namespace {{PROJECT_NAME_PASCAL}}\Modules\Frontend\Controllers;

class IndexController extends ControllerBase
{
    public function indexAction()
    {
    }
}
"#;

const MODULES_PUBLIC_INDEX: &str = r#"<?php

use Phalcon\Di\FactoryDefault;
use Phalcon\Mvc\Application;

error_reporting(E_ALL);

define('BASE_PATH', dirname(__DIR__));
define('APP_PATH', BASE_PATH . '/app');

try {
    $di = new FactoryDefault();

    include APP_PATH . '/config/services.php';

    $config = $di->getConfig();

    $application = new Application($di);

    include APP_PATH . '/config/modules.php';

    echo $application->handle()->getContent();
} catch (\Exception $e) {
    echo $e->getMessage() . '<br>';
    echo '<pre>' . $e->getTraceAsString() . '</pre>';
}
"#;
