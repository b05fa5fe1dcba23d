//! Execution order and argument flow through compiled chains.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use strata_core::{builtins, injectable, Error, Function, Injectables, ParameterSpec, Phase, Request};
use strata_middleware::{compile_chain, BoxedMiddleware, FnMiddleware};

type Log = Arc<Mutex<Vec<String>>>;

fn recorder(name: &'static str, log: &Log) -> BoxedMiddleware {
    let (req_log, ep_log, render_log) = (log.clone(), log.clone(), log.clone());
    FnMiddleware::new(name)
        .request(ParameterSpec::from_names(["next"]), move |next, _| {
            req_log.lock().unwrap().push(format!("{name}:request:in"));
            let out = next.run_empty();
            req_log.lock().unwrap().push(format!("{name}:request:out"));
            out
        })
        .endpoint(ParameterSpec::from_names(["next"]), move |next, _| {
            ep_log.lock().unwrap().push(format!("{name}:endpoint"));
            next.run_empty()
        })
        .render(ParameterSpec::from_names(["next"]), move |next, _| {
            render_log.lock().unwrap().push(format!("{name}:render"));
            next.run_empty()
        })
        .boxed()
}

fn request(path: &str) -> Request {
    http::Request::builder()
        .uri(path)
        .body(Bytes::new())
        .unwrap()
}

#[test]
fn phases_run_in_middleware_order() {
    let log: Log = Arc::default();
    let ep_log = log.clone();
    let endpoint = Function::new("endpoint", ParameterSpec::new(), move |_| {
        ep_log.lock().unwrap().push("endpoint".to_string());
        Ok("ctx".to_string())
    });
    let render_log = log.clone();
    let render = Function::new_shared(
        "render",
        ParameterSpec::from_names([builtins::CONTEXT]),
        move |args| {
            render_log.lock().unwrap().push("render".to_string());
            args.shared(builtins::CONTEXT)
                .ok_or_else(|| Error::invalid_endpoint("render", "no context"))
        },
    );

    let chain = compile_chain(
        &[recorder("outer", &log), recorder("inner", &log)],
        &endpoint,
        &render,
        Vec::<String>::new(),
    )
    .unwrap();

    let out = chain.execute(Injectables::new()).unwrap();
    assert_eq!(out.downcast_ref::<String>().unwrap(), "ctx");
    assert_eq!(
        *log.lock().unwrap(),
        [
            "outer:request:in",
            "inner:request:in",
            "outer:endpoint",
            "inner:endpoint",
            "endpoint",
            "outer:render",
            "inner:render",
            "render",
            "inner:request:out",
            "outer:request:out",
        ]
    );
    assert_eq!(
        chain.middleware_names(Phase::Request).collect::<Vec<_>>(),
        ["outer", "inner"]
    );
}

#[test]
fn request_middleware_reads_the_request() {
    let auth = FnMiddleware::new("auth")
        .provides(["user"])
        .request(
            ParameterSpec::from_names(["next", "request"]),
            |next, args| {
                let request: &Request = args.require("request")?;
                let mut provided = Injectables::new();
                provided.insert("user", request.uri().path().trim_start_matches('/').to_string());
                next.run(provided)
            },
        )
        .boxed();
    let endpoint = Function::new("whoami", ParameterSpec::from_names(["user"]), |args| {
        Ok(args.require::<String>("user")?.clone())
    });

    let chain = compile_chain(&[auth], &endpoint, &Function::identity_render(), ["request"]).unwrap();

    let mut env = Injectables::new();
    env.insert("request", request("/ferris"));
    let out = chain.execute(env).unwrap();
    assert_eq!(out.downcast_ref::<String>().unwrap(), "ferris");
}

#[test]
fn endpoint_provides_do_not_reach_render() {
    let cursor = FnMiddleware::new("cursor")
        .endpoint_provides(["cursor"])
        .endpoint(ParameterSpec::from_names(["next"]), |next, _| {
            let mut provided = Injectables::new();
            provided.insert("cursor", 5_u32);
            next.run(provided)
        })
        .boxed();
    let endpoint = Function::new("page", ParameterSpec::from_names(["cursor"]), |args| {
        Ok(*args.require::<u32>("cursor")?)
    });

    let chain = compile_chain(
        std::slice::from_ref(&cursor),
        &endpoint,
        &Function::identity_render(),
        Vec::<String>::new(),
    )
    .unwrap();
    let out = chain.execute(Injectables::new()).unwrap();
    assert_eq!(out.downcast_ref::<u32>(), Some(&5));

    let render = Function::new("render", ParameterSpec::from_names(["context", "cursor"]), |_| {
        Ok(())
    });
    let err = compile_chain(&[cursor], &endpoint, &render, Vec::<String>::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::UnresolvedArgument { phase: Phase::Render, ref missing } if missing == &["cursor"]
    ));
}

#[test]
fn request_middleware_cannot_use_later_provides() {
    let first = FnMiddleware::new("first")
        .request(ParameterSpec::from_names(["next", "session"]), |next, _| next.run_empty())
        .boxed();
    let second = FnMiddleware::new("second")
        .provides(["session"])
        .request(ParameterSpec::from_names(["next"]), |next, _| next.run_empty())
        .boxed();
    let endpoint = Function::new("index", ParameterSpec::new(), |_| Ok(()));

    let err = compile_chain(
        &[first, second],
        &endpoint,
        &Function::identity_render(),
        Vec::<String>::new(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::UnresolvedArgument { phase: Phase::Request, .. }
    ));
}

#[test]
fn middleware_may_recover_from_endpoint_errors() {
    let rescue = FnMiddleware::new("rescue")
        .request(ParameterSpec::from_names(["next"]), |next, _| {
            match next.run_empty() {
                Err(Error::Handler(err)) => Ok(injectable(format!("recovered: {err}"))),
                other => other,
            }
        })
        .boxed();
    let endpoint = Function::new("fails", ParameterSpec::new(), |_| -> strata_core::Result<()> {
        Err(Error::handler(anyhow::anyhow!("database down")))
    });

    let chain = compile_chain(
        &[rescue],
        &endpoint,
        &Function::identity_render(),
        Vec::<String>::new(),
    )
    .unwrap();
    let out = chain.execute(Injectables::new()).unwrap();
    assert_eq!(
        out.downcast_ref::<String>().unwrap(),
        "recovered: database down"
    );
}
