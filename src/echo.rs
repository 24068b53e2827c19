use crate::dispatcher::{HandlerRequest, HandlerResponse};
use serde_json::json;

/// Default handler: reflects the captured path parameters, the parsed
/// body and the query parameters back with status 200.
pub fn echo_handler(req: &HandlerRequest) -> HandlerResponse {
    HandlerResponse::json(
        200,
        json!({
            "params": req.path_params,
            "body": req.body,
            "query": req.query_params,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use may::sync::mpsc;
    use std::collections::HashMap;

    #[test]
    fn test_echo_shape() {
        let (reply_tx, _rx) = mpsc::channel();
        let req = HandlerRequest {
            method: Method::POST,
            path: "/articles/hello".into(),
            route: "/articles/:slug".into(),
            handler_key: "/articles/[slug]".into(),
            path_params: HashMap::from([("slug".to_string(), "hello".to_string())]),
            query_params: HashMap::from([("page".to_string(), "2".to_string())]),
            headers: HashMap::new(),
            body: None,
            reply_tx,
        };
        let resp = echo_handler(&req);
        assert_eq!(resp.status, 200);
        assert_eq!(
            resp.body,
            json!({ "params": { "slug": "hello" }, "body": null, "query": { "page": "2" } })
        );
    }
}
