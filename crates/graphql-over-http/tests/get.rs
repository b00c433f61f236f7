mod common;

use common::{handler, options};
use http::{header::ALLOW, StatusCode};

#[tokio::test]
async fn simple_query() {
    let response = handler(options()).get(&[("query", "{test}")]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers["content-type"], "application/json");
    insta::assert_json_snapshot!(response.body, @r#"
    {
      "data": {
        "test": "Hello World"
      }
    }
    "#);
}

#[tokio::test]
async fn query_with_variables() {
    let response = handler(options())
        .get(&[
            ("query", "query helloWho($who: String) { test(who: $who) }"),
            ("variables", r#"{"who":"Dolly"}"#),
        ])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    insta::assert_json_snapshot!(response.body, @r#"
    {
      "data": {
        "test": "Hello Dolly"
      }
    }
    "#);
}

#[tokio::test]
async fn variable_defaults_apply_when_absent() {
    let response = handler(options())
        .get(&[("query", r#"query helloWho($who: String = "Default") { test(who: $who) }"#)])
        .await;

    insta::assert_json_snapshot!(response.body, @r#"
    {
      "data": {
        "test": "Hello Default"
      }
    }
    "#);
}

#[tokio::test]
async fn operation_name_selects_among_several() {
    let query = r#"
        query helloYou { test(who: "You"), ...shared }
        query helloWorld { test(who: "World"), ...shared }
        query helloDolly { test(who: "Dolly"), ...shared }
        fragment shared on Query {
          shared: test(who: "Everyone")
        }
    "#;

    let response = handler(options())
        .get(&[("query", query), ("operationName", "helloWorld")])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    insta::assert_json_snapshot!(response.body, @r#"
    {
      "data": {
        "test": "Hello World",
        "shared": "Hello Everyone"
      }
    }
    "#);
}

#[tokio::test]
async fn mutation_is_refused() {
    let response = handler(options())
        .get(&[("query", "mutation TestMutation { writeTest { test } }")])
        .await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers[ALLOW], "POST");
    assert_eq!(
        response.text,
        r#"{"errors":[{"message":"Can only perform a mutation operation from a POST request."}]}"#
    );
}

#[tokio::test]
async fn query_selected_next_to_a_mutation_is_allowed() {
    let query = r#"
        query TestQuery { test }
        mutation TestMutation { writeTest { test } }
    "#;
    let handler = handler(options());

    let response = handler.get(&[("query", query), ("operationName", "TestQuery")]).await;
    assert_eq!(response.status, StatusCode::OK);
    insta::assert_json_snapshot!(response.body, @r#"
    {
      "data": {
        "test": "Hello World"
      }
    }
    "#);

    let response = handler
        .get(&[("query", query), ("operationName", "TestMutation")])
        .await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers[ALLOW], "POST");
}

#[tokio::test]
async fn subscription_is_refused() {
    let response = handler(options())
        .get(&[("query", "subscription TestSubscription { test }")])
        .await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers[ALLOW], "POST");
}

#[tokio::test]
async fn missing_query() {
    let response = handler(options()).get(&[]).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text, r#"{"errors":[{"message":"Must provide query string."}]}"#);
}

#[tokio::test]
async fn empty_query() {
    let response = handler(options()).get(&[("query", "")]).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text, r#"{"errors":[{"message":"Must provide query string."}]}"#);
}

#[tokio::test]
async fn invalid_variables() {
    let response = handler(options())
        .get(&[
            ("query", "query helloWho($who: String) { test(who: $who) }"),
            ("variables", "who:You"),
        ])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text, r#"{"errors":[{"message":"Variables are invalid JSON."}]}"#);
}

#[tokio::test]
async fn repeated_parameters_keep_the_first_value() {
    let response = handler(options())
        .get(&[
            ("query", r#"{ test(who: "First") }"#),
            ("query", r#"{ test(who: "Second") }"#),
        ])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text, r#"{"data":{"test":"Hello First"}}"#);
}

#[tokio::test]
async fn syntax_error() {
    let response = handler(options()).get(&[("query", "{test")]).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let errors = response.body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0]["message"].as_str().unwrap().starts_with("Syntax Error:"));
    assert!(!errors[0]["locations"].as_array().unwrap().is_empty());
    assert_eq!(response.body.get("data"), None);
}

#[tokio::test]
async fn unknown_operation_name_is_reported_by_the_executor() {
    let response = handler(options())
        .get(&[("query", "query Q { test }"), ("operationName", "Other")])
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    insta::assert_json_snapshot!(response.body, @r#"
    {
      "errors": [
        {
          "message": "Unknown operation named \"Other\"."
        }
      ]
    }
    "#);
}

#[tokio::test]
async fn several_operations_without_a_name() {
    let query = r#"
        query TestQuery { test }
        mutation TestMutation { writeTest { test } }
    "#;

    let response = handler(options()).get(&[("query", query)]).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    insta::assert_json_snapshot!(response.body, @r#"
    {
      "errors": [
        {
          "message": "Must provide operation name if query contains multiple operations."
        }
      ]
    }
    "#);
}
