//! Tests for the module dispatcher
//!
//! The transport is replaced with a mockall stub so routing, validation and
//! decoding can be checked without a server.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use mockall::mock;
    use reqwest::Method;
    use serde_json::{json, Value};
    use tokio_util::sync::CancellationToken;

    use crate::core::{Endpoint, Transport};
    use crate::dispatch::{route, Dispatcher};
    use crate::error::{ClientError, ErrorKind, Result};
    use crate::render::{self, SUMMARY};
    use crate::schema::{AnalysisInputs, AnalysisResponse, Module};
    use crate::tests::common::{clean_debug_response, full_formal_response, nlp_response};

    mock! {
        pub HttpStub {}

        #[async_trait]
        impl Transport for HttpStub {
            async fn call(&self, endpoint: Endpoint, method: Method, body: Option<Value>) -> Result<Value>;
            fn base_url(&self) -> &str;
        }
    }

    fn dispatcher_over(stub: MockHttpStub) -> Dispatcher {
        Dispatcher::new(Arc::new(stub))
    }

    /// Transport that answers only after a delay
    struct SlowTransport {
        delay: Duration,
        response: Value,
    }

    #[async_trait]
    impl Transport for SlowTransport {
        async fn call(&self, _endpoint: Endpoint, _method: Method, _body: Option<Value>) -> Result<Value> {
            tokio::time::sleep(self.delay).await;
            Ok(self.response.clone())
        }

        fn base_url(&self) -> &str {
            "http://slow.test"
        }
    }

    #[tokio::test]
    async fn test_blank_code_never_reaches_transport() {
        for module in Module::ALL {
            let mut stub = MockHttpStub::new();
            stub.expect_call().never();

            let dispatcher = dispatcher_over(stub);
            let inputs = AnalysisInputs::new("   \n\t").function_name("main");

            let err = dispatcher.dispatch(module, &inputs).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "module {}", module);
        }
    }

    #[tokio::test]
    async fn test_formal_requires_function_name() {
        let mut stub = MockHttpStub::new();
        stub.expect_call().never();

        let dispatcher = dispatcher_over(stub);
        let inputs = AnalysisInputs::new("int f(int x) { return x; }").function_name("  ");

        let err = dispatcher
            .dispatch(Module::FormalVerification, &inputs)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_debug_routes_with_default_filename() {
        let mut stub = MockHttpStub::new();
        stub.expect_call()
            .withf(|endpoint, method, body| {
                *endpoint == Endpoint::Debug
                    && *method == Method::POST
                    && body.as_ref() == Some(&json!({"code": "int main(){}", "filename": "temp.c"}))
            })
            .times(1)
            .returning(|_, _, _| Ok(clean_debug_response()));

        let dispatcher = dispatcher_over(stub);
        let report = dispatcher
            .dispatch(Module::Debugging, &AnalysisInputs::new("int main(){}"))
            .await
            .unwrap();

        assert_eq!(report.heading, "DEBUGGING RESULTS");
        assert_eq!(report.titles()[0], SUMMARY);
    }

    #[tokio::test]
    async fn test_nlp_sends_code_only() {
        let mut stub = MockHttpStub::new();
        stub.expect_call()
            .withf(|endpoint, method, body| {
                *endpoint == Endpoint::NlpAnalyze
                    && *method == Method::POST
                    && body.as_ref() == Some(&json!({"code": "int add(int a, int b);"}))
            })
            .times(1)
            .returning(|_, _, _| Ok(nlp_response()));

        let dispatcher = dispatcher_over(stub);
        let inputs = AnalysisInputs::new("int add(int a, int b);")
            .filename("add.c")
            .function_name("add");

        let response = dispatcher.analyze(Module::Nlp, &inputs).await.unwrap();

        match response {
            AnalysisResponse::Nlp(nlp) => {
                assert_eq!(nlp.functions_found, 1);
                assert_eq!(nlp.test_cases.get("add").unwrap().total(), 3);
            }
            other => panic!("expected NLP response, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_formal_routes_and_trims_function_name() {
        let mut stub = MockHttpStub::new();
        stub.expect_call()
            .withf(|endpoint, method, body| {
                *endpoint == Endpoint::FormalVerify
                    && *method == Method::POST
                    && body.as_ref() == Some(&json!({"code": "int abs_val(int x);", "function_name": "abs_val"}))
            })
            .times(1)
            .returning(|_, _, _| Ok(full_formal_response()));

        let dispatcher = dispatcher_over(stub);
        let inputs = AnalysisInputs::new("int abs_val(int x);").function_name(" abs_val ");

        let report = dispatcher
            .dispatch(Module::FormalVerification, &inputs)
            .await
            .unwrap();

        assert_eq!(report.heading, "FORMAL VERIFICATION RESULTS");
    }

    #[tokio::test]
    async fn test_formal_function_name_backfilled_from_request() {
        let mut stub = MockHttpStub::new();
        stub.expect_call().times(1).returning(|_, _, _| {
            Ok(json!({
                "contracts": {"preconditions": [], "postconditions": ["ensures \\result >= 0;"]}
            }))
        });

        let dispatcher = dispatcher_over(stub);
        let inputs = AnalysisInputs::new("int abs_val(int x);").function_name("abs_val");

        match dispatcher.analyze(Module::FormalVerification, &inputs).await.unwrap() {
            AnalysisResponse::FormalVerification(formal) => {
                assert_eq!(formal.function_name, "abs_val");
                assert!(!formal.is_valid());
            }
            other => panic!("expected formal response, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_required_field_is_decode_error() {
        let mut stub = MockHttpStub::new();
        stub.expect_call()
            .times(1)
            .returning(|_, _, _| Ok(json!({"status": "Analysis complete"})));

        let dispatcher = dispatcher_over(stub);
        let err = dispatcher
            .dispatch(Module::Debugging, &AnalysisInputs::new("int main(){}"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_wrong_type_is_decode_error() {
        let mut stub = MockHttpStub::new();
        stub.expect_call().times(1).returning(|_, _, _| {
            Ok(json!({
                "compilation_analysis": {"compilation_successful": "yes"}
            }))
        });

        let dispatcher = dispatcher_over(stub);
        let err = dispatcher
            .analyze(Module::Debugging, &AnalysisInputs::new("int main(){}"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_remote_error_passes_through() {
        let mut stub = MockHttpStub::new();
        stub.expect_call()
            .times(1)
            .returning(|_, _, _| Err(ClientError::remote(400, "bad input", "{}")));

        let dispatcher = dispatcher_over(stub);
        let err = dispatcher
            .dispatch(Module::Nlp, &AnalysisInputs::new("int x;"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.cause(), "bad input");
    }

    #[tokio::test]
    async fn test_status_uses_module_status_endpoint() {
        let mut stub = MockHttpStub::new();
        stub.expect_call()
            .withf(|endpoint, method, body| {
                *endpoint == Endpoint::FormalStatus && *method == Method::GET && body.is_none()
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(json!({"status": "ready", "framacAvailable": true, "llm_available": false}))
            });

        let dispatcher = dispatcher_over(stub);
        let snapshot = dispatcher.status(Module::FormalVerification).await.unwrap();

        assert_eq!(snapshot.status.as_deref(), Some("ready"));
        assert_eq!(snapshot.framac_available, Some(true));
        assert_eq!(snapshot.llm_available, Some(false));
        assert_eq!(snapshot.gdb_available, None);
    }

    #[tokio::test]
    async fn test_list_functions() {
        let mut stub = MockHttpStub::new();
        stub.expect_call()
            .withf(|endpoint, method, _| *endpoint == Endpoint::NlpFunctions && *method == Method::GET)
            .times(1)
            .returning(|_, _, _| {
                Ok(json!({
                    "functions": [{"name": "add", "signature": "int add(int, int)", "file": "math.c"}],
                    "count": 1
                }))
            });

        let dispatcher = dispatcher_over(stub);
        let listing = dispatcher.list_functions().await.unwrap();

        assert_eq!(listing.count, 1);
        assert_eq!(listing.functions[0].name, "add");
    }

    #[tokio::test]
    async fn test_cancellation_discards_late_response() {
        let transport = SlowTransport {
            delay: Duration::from_secs(5),
            response: clean_debug_response(),
        };
        let dispatcher = Dispatcher::new(Arc::new(transport));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = dispatcher
            .dispatch_cancellable(Module::Debugging, &AnalysisInputs::new("int main(){}"), &cancel)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn test_uncancelled_dispatch_completes() {
        let transport = SlowTransport {
            delay: Duration::from_millis(10),
            response: clean_debug_response(),
        };
        let dispatcher = Dispatcher::new(Arc::new(transport));

        let report = dispatcher
            .dispatch_cancellable(
                Module::Debugging,
                &AnalysisInputs::new("int main(){}"),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(report.heading, "DEBUGGING RESULTS");
    }

    #[test]
    fn test_routing_table_is_consistent() {
        for module in Module::ALL {
            let entry = route(module);
            assert_eq!(entry.module, module);
            assert_eq!(entry.endpoint, module.analysis_endpoint());
            assert_eq!(entry.status_endpoint, module.status_endpoint());
            assert_eq!(entry.endpoint.method(), Method::POST);
            assert_eq!(entry.status_endpoint.method(), Method::GET);
        }
    }

    #[test]
    fn test_each_route_renders_its_own_module() {
        let responses = [
            AnalysisResponse::decode(Module::Debugging, clean_debug_response()).unwrap(),
            AnalysisResponse::decode(Module::Nlp, nlp_response()).unwrap(),
            AnalysisResponse::decode(Module::FormalVerification, full_formal_response()).unwrap(),
        ];
        let headings = [
            "DEBUGGING RESULTS",
            "CODE ANALYSIS & TEST GENERATION",
            "FORMAL VERIFICATION RESULTS",
        ];

        for (response, heading) in responses.iter().zip(headings) {
            let own = (route(response.module()).render)(response);
            assert_eq!(own.heading, heading);
            assert_eq!(own, render::render(response));

            // A route handed another module's response defers to that module
            for module in Module::ALL {
                assert_eq!((route(module).render)(response).heading, heading);
            }
        }
    }

    #[test]
    fn test_module_names_parse() {
        assert_eq!("debug".parse::<Module>().unwrap(), Module::Debugging);
        assert_eq!("NLP".parse::<Module>().unwrap(), Module::Nlp);
        assert_eq!("formal".parse::<Module>().unwrap(), Module::FormalVerification);
        assert_eq!(
            "profiling".parse::<Module>().unwrap_err().kind(),
            ErrorKind::Validation
        );
    }
}
