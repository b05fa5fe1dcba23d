//! Route registration, ordering and dispatch through an application.

use std::collections::HashMap;

use http::Method;
use strata::core::ErrorKind;
use strata::prelude::*;

const MODES: [SlashMode; 3] = [SlashMode::Strict, SlashMode::Rewrite, SlashMode::Redirect];

const NO_ARG_ROUTES: [&str; 7] = [
    "/",
    "/alpha",
    "/alpha/",
    "/beta",
    "/gamma/",
    "/delta/epsilon",
    "/zeta/eta/",
];

const ARG_ROUTES: [&str; 7] = [
    "/<theta>",
    "/iota/<kappa>/<lambda>/mu/",
    "/<nu:int>/<xi:float>/<omicron:unicode>/<pi:str>/",
    "/<rho+>/",
    "/<sigma*>/",
    "/<tau?>/",
    "/<upsilon:>/",
];

const BROKEN_ROUTES: [&str; 4] = ["alf", "/bet//", "/<cat->/", "/<very*doge>/"];

fn no_op() -> Function {
    Function::new("no_op", ParameterSpec::new(), |_| Ok(()))
}

fn api() -> Function {
    Function::new("api", ParameterSpec::from_names(["api_path"]), |args| {
        Ok(format!("api: {}", args.require::<PathValue>("api_path")?))
    })
}

fn two_segments() -> Function {
    Function::new("two_segments", ParameterSpec::from_names(["one", "two"]), |args| {
        Ok(format!(
            "two_segments: {}, {}",
            args.require::<PathValue>("one")?,
            args.require::<PathValue>("two")?
        ))
    })
}

fn three_segments() -> Function {
    Function::new(
        "three_segments",
        ParameterSpec::from_names(["one", "two", "three"]),
        |args| {
            Ok(format!(
                "three_segments: {}, {}, {}",
                args.require::<PathValue>("one")?,
                args.require::<PathValue>("two")?,
                args.require::<PathValue>("three")?
            ))
        },
    )
}

fn ordered_routes() -> Vec<RouteSpec> {
    vec![
        ("/api/<api_path+>", api(), render_basic()).into(),
        ("/<one>/<two>", two_segments(), render_basic()).into(),
        ("/<one>/<two>/<three>", three_segments(), render_basic()).into(),
    ]
}

fn get_text(app: &Application, path: &str) -> String {
    let out = app.dispatch(&Method::GET, path, None).unwrap();
    out.downcast_ref::<String>().cloned().unwrap()
}

#[test]
fn route_executes_with_injectables() {
    let endpoint = Function::new("lookup", ParameterSpec::from_names(["request"]), |args| {
        let request = args.require::<HashMap<String, String>>("request")?;
        Ok(request["stephen"].clone())
    });
    let route = Route::new("/", endpoint).unwrap();

    let mut env = Injectables::new();
    env.insert(
        "request",
        HashMap::from([("stephen".to_string(), "laporte".to_string())]),
    );
    let out = route.execute(&env).unwrap();
    assert_eq!(out.downcast_ref::<String>().unwrap(), "laporte");
}

#[test]
fn route_without_endpoint_fails() {
    let route = Route::builder("/a/b/<t:int>/thing/<das+int>").build().unwrap();
    let err = route.execute(&Injectables::new()).unwrap_err();
    assert!(matches!(err, Error::InvalidEndpoint { .. }));
}

#[test]
fn application_basics() {
    let endpoint = Function::new("lolporte", ParameterSpec::from_names(["request"]), |_| {
        Ok("lolporte".to_string())
    });
    let app = Application::new([Route::new("/", endpoint).unwrap()]).unwrap();

    let request = http::Request::builder()
        .uri("/")
        .body(bytes::Bytes::new())
        .unwrap();
    let out = app.handle(request, None).unwrap();
    assert_eq!(out.downcast_ref::<String>().unwrap(), "lolporte");
}

#[test]
fn route_order_from_list() {
    let routes = ordered_routes();
    let app = Application::new(routes.clone()).unwrap();

    assert_eq!(get_text(&app, "/api/a"), "api: a");
    assert_eq!(get_text(&app, "/api/a/b"), "api: a/b");
    assert_eq!(get_text(&app, "/x/y"), "two_segments: x, y");
    assert_eq!(get_text(&app, "/x/y/z"), "three_segments: x, y, z");

    let patterns: Vec<&str> = app.routes().iter().map(|r| r.pattern().as_str()).collect();
    let expected: Vec<&str> = routes.iter().map(|r| r.pattern.as_str()).collect();
    assert_eq!(patterns, expected);
}

#[test]
fn route_order_incremental() {
    let mut app = Application::new(Vec::<RouteSpec>::new()).unwrap();
    for spec in ordered_routes() {
        let pattern = spec.pattern.clone();
        app.add(spec).unwrap();
        assert_eq!(get_text(&app, "/api/a/b"), "api: a/b");
        assert_eq!(app.routes().last().unwrap().pattern().as_str(), pattern);
    }
}

#[test]
fn ok_routes_compile_in_every_mode() {
    for mode in MODES {
        for pattern in NO_ARG_ROUTES.iter().chain(&ARG_ROUTES) {
            let route = Route::builder(*pattern)
                .slash_mode(mode)
                .endpoint(no_op())
                .build();
            assert!(route.is_ok(), "{pattern} in {mode} mode: {route:?}");
        }
    }
}

#[test]
fn broken_routes_fail_in_every_mode() {
    for mode in MODES {
        for pattern in BROKEN_ROUTES {
            let err = Route::builder(pattern)
                .slash_mode(mode)
                .endpoint(no_op())
                .build()
                .unwrap_err();
            assert!(
                matches!(err, Error::InvalidUrlPattern(_)),
                "{pattern} in {mode} mode: {err:?}"
            );
            assert_eq!(err.kind(), ErrorKind::Compile);
        }
    }
}

#[test]
fn conflicting_middleware_providers_fail_at_bind() {
    let provider = |name: &'static str| {
        FnMiddleware::new(name)
            .provides(["user"])
            .request(ParameterSpec::from_names(["next"]), |next, _| next.run_empty())
            .boxed()
    };
    let result = Application::builder()
        .middleware(provider("session"))
        .middleware(provider("token"))
        .route(("/", no_op()))
        .build();

    match result.unwrap_err() {
        Error::ProviderConflict { name, sources } => {
            assert_eq!(name, "user");
            assert_eq!(sources, ["session", "token"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unprovided_endpoint_argument_fails_at_bind() {
    let endpoint = Function::new("profile", ParameterSpec::from_names(["user_id"]), |_| Ok(()));
    let err = Application::new([("/profile", endpoint)]).unwrap_err();
    match err {
        Error::UnresolvedArgument { phase, missing } => {
            assert_eq!(phase, Phase::Endpoint);
            assert_eq!(missing, ["user_id"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn application_middleware_provides_to_endpoint() {
    let auth = FnMiddleware::new("auth")
        .provides(["user"])
        .request(ParameterSpec::from_names(["next", "request"]), |next, args| {
            let request = args.require::<Request>("request")?;
            let user = request
                .headers()
                .get("x-user")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("anonymous")
                .to_string();
            let mut provided = Injectables::new();
            provided.insert("user", user);
            next.run(provided)
        })
        .boxed();
    let whoami = Function::new("whoami", ParameterSpec::from_names(["user"]), |args| {
        Ok(args.require::<String>("user")?.clone())
    });
    let app = Application::builder()
        .middleware(auth)
        .route(RouteSpec::get("/whoami", whoami))
        .build()
        .unwrap();

    let request = http::Request::builder()
        .uri("/whoami")
        .header("x-user", "ada")
        .body(bytes::Bytes::new())
        .unwrap();
    let out = app.handle(request, None).unwrap();
    assert_eq!(out.downcast_ref::<String>().unwrap(), "ada");
}

#[test]
fn no_match_reports_method_and_path() {
    let app = Application::new([RouteSpec::get("/only", no_op())]).unwrap();
    let err = app.dispatch(&Method::GET, "/other", None).unwrap_err();
    assert!(err.is_no_match());
    assert!(err.to_string().contains("/other"));
}

#[test]
fn typed_variables_reach_endpoint() {
    let sum = Function::new("sum", ParameterSpec::from_names(["t", "das"]), |args| {
        let t = args.require::<PathValue>("t")?.as_int().unwrap_or_default();
        let das: i64 = args
            .require::<PathValue>("das")?
            .as_list()
            .unwrap_or_default()
            .iter()
            .filter_map(PathValue::as_int)
            .sum();
        Ok(t + das)
    });
    let app = Application::new([("/a/b/<t:int>/thing/<das*int>", sum)]).unwrap();

    let out = app.dispatch(&Method::GET, "/a/b/1/thing/1/2/3/4", None).unwrap();
    assert_eq!(out.downcast_ref::<i64>(), Some(&11));
    let out = app.dispatch(&Method::GET, "/a/b/1/thing", None).unwrap();
    assert_eq!(out.downcast_ref::<i64>(), Some(&1));
    assert!(app
        .dispatch(&Method::GET, "/a/b/1/thing/hi", None)
        .unwrap_err()
        .is_no_match());
}
