mod common;

use common::{MockProvider, RecordingErrors, RecordingSink, block_on_test};
use dioxus_data_hooks::{
    hooks::{create, custom_mutation, invalidate, update},
    keys::{QueryAction, QueryKeyBuilder},
    prelude::*,
};
use serde_json::{Value, json};

fn entry(provider: &MockProvider) -> DataProviderEntry {
    DataProviderEntry::new(provider.clone()).with_custom_requests(provider.clone())
}

fn context_for(
    provider: &MockProvider,
    sink: &RecordingSink,
    errors: &RecordingErrors,
) -> DataContext {
    DataConfig::new(entry(provider))
        .with_notification(sink.clone())
        .with_error_handler(errors.handler())
        .build()
}

#[test]
fn create_reports_missing_values_then_resource_before_calling_provider() {
    let provider = MockProvider::new(0);
    let context = context_for(&provider, &RecordingSink::default(), &RecordingErrors::default());

    let missing_both = create::<Value, Value>(&context, UseCreateParams::new());
    assert_eq!(
        missing_both.err(),
        Some(ConfigError::MissingValues { hook: "use_create" })
    );

    let missing_resource =
        create::<Value, Value>(&context, UseCreateParams::new().values(json!({ "title": "a" })));
    assert_eq!(
        missing_resource.err(),
        Some(ConfigError::MissingResource { hook: "use_create" })
    );
    assert_eq!(provider.calls.create.get(), 0);
}

#[test]
fn create_success_notifies_with_default_message() {
    block_on_test(async {
        let provider = MockProvider::new(0);
        let sink = RecordingSink::default();
        let errors = RecordingErrors::default();
        let context = context_for(&provider, &sink, &errors);

        let response = create::<Value, Value>(
            &context,
            UseCreateParams::new()
                .resource("posts")
                .values(json!({ "title": "Hello" })),
        )
        .expect("valid create")
        .await
        .expect("create succeeds");

        assert_eq!(response.data, json!({ "title": "Hello" }));
        assert_eq!(provider.calls.create.get(), 1);
        assert!(errors.seen.borrow().is_empty());
        assert_eq!(
            *sink.opened.borrow(),
            vec![
                OpenNotificationParams::success("Successfully created posts")
                    .with_key("create-notification")
                    .with_description("Success")
            ]
        );
    });
}

#[test]
fn create_failure_reaches_error_handler_and_notification() {
    block_on_test(async {
        let provider = MockProvider::failing(HttpError::new("Conflict", 409));
        let sink = RecordingSink::default();
        let errors = RecordingErrors::default();
        let context = context_for(&provider, &sink, &errors);

        let result = create::<Value, Value>(
            &context,
            UseCreateParams::new()
                .resource("posts")
                .values(json!({ "title": "Hello" })),
        )
        .expect("valid create")
        .await;

        assert_eq!(result.err().map(|error| error.status_code), Some(409));
        assert_eq!(errors.seen.borrow().len(), 1);
        let opened = sink.opened.borrow();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].kind, NotificationKind::Error);
        assert_eq!(
            opened[0].message,
            "There was an error creating posts (status code: 409)"
        );
        assert_eq!(opened[0].description.as_deref(), Some("Conflict"));
    });
}

#[test]
fn suppressed_and_explicit_notifications_override_fallback() {
    block_on_test(async {
        let provider = MockProvider::new(0);
        let sink = RecordingSink::default();
        let context = context_for(&provider, &sink, &RecordingErrors::default());

        create::<Value, Value>(
            &context,
            UseCreateParams::new()
                .resource("posts")
                .values(json!({}))
                .success_notification(NotificationProp::Suppress),
        )
        .expect("valid create")
        .await
        .expect("create succeeds");
        assert!(sink.opened.borrow().is_empty());

        create::<Value, Value>(
            &context,
            UseCreateParams::new()
                .resource("posts")
                .values(json!({ "title": "Custom" }))
                .success_notification(NotificationProp::with(|response: &CreateResponse<Value>, _values, resource| {
                    OpenNotificationParams::success(format!(
                        "{} saved to {resource}",
                        response.data["title"].as_str().unwrap_or_default()
                    ))
                    .into()
                })),
        )
        .expect("valid create")
        .await
        .expect("create succeeds");
        assert_eq!(sink.opened.borrow()[0].message, "Custom saved to posts");
    });
}

#[test]
fn update_checks_id_first_and_notifies_with_record_key() {
    block_on_test(async {
        let provider = MockProvider::new(0);
        let sink = RecordingSink::default();
        let context = context_for(&provider, &sink, &RecordingErrors::default());

        let missing = update::<Value, Value>(&context, UseUpdateParams::new().resource("posts"));
        assert_eq!(
            missing.err(),
            Some(ConfigError::MissingId { hook: "use_update" })
        );
        assert_eq!(provider.calls.update.get(), 0);

        let response = update::<Value, Value>(
            &context,
            UseUpdateParams::new()
                .resource("posts")
                .id(3_i64)
                .values(json!({ "title": "Edited" })),
        )
        .expect("valid update")
        .await
        .expect("update succeeds");

        assert_eq!(response.data, json!({ "title": "Edited", "id": 3 }));
        let opened = sink.opened.borrow();
        assert_eq!(opened[0].key.as_deref(), Some("3-posts-notification"));
        assert_eq!(opened[0].message, "Successfully updated posts");
    });
}

#[test]
fn update_invalidates_lists_and_the_record_detail() {
    block_on_test(async {
        let provider = MockProvider::new(0);
        let context = context_for(&provider, &RecordingSink::default(), &RecordingErrors::default());
        let client = context.client();

        let scope = QueryKeyBuilder::new().data("default").resource("posts");
        let list = scope
            .clone()
            .action(QueryAction::List)
            .params(&json!({ "filters": [] }))
            .get();
        let detail = scope.clone().action(QueryAction::One).id(3_i64).params(&json!({})).get();
        let other_detail = scope.action(QueryAction::One).id(4_i64).params(&json!({})).get();
        for key in [&list, &detail, &other_detail] {
            client.set_query_data::<Value>(key.clone(), Ok(json!(null)));
        }

        update::<Value, Value>(
            &context,
            UseUpdateParams::new()
                .resource("posts")
                .id(3_i64)
                .values(json!({})),
        )
        .expect("valid update")
        .await
        .expect("update succeeds");

        assert!(!client.cache().contains(&list));
        assert!(!client.cache().contains(&detail));
        assert!(client.cache().contains(&other_detail));
    });
}

#[test]
fn custom_mutation_requires_custom_capability() {
    let provider = MockProvider::new(0);
    let context = DataConfig::new(DataProviderEntry::new(provider.clone())).build();

    let result = custom_mutation::<Value, Value>(
        &context,
        UseCustomMutationParams::new("/publish", HttpMethod::Post, json!({})),
    );
    assert_eq!(
        result.err(),
        Some(ConfigError::CustomNotImplemented {
            provider: "default".to_string()
        })
    );
    assert_eq!(provider.calls.custom.get(), 0);
}

#[test]
fn custom_mutation_error_uses_translated_fallback() {
    struct French;

    impl I18nProvider for French {
        fn translate(
            &self,
            key: &str,
            options: Option<&Value>,
            _default_message: Option<&str>,
        ) -> Option<String> {
            let code = options?.get("statusCode")?;
            (key == "notifications.error").then(|| format!("Erreur (code : {code})"))
        }

        fn change_locale(&self, _locale: &str) {}

        fn get_locale(&self) -> Option<String> {
            Some("fr".to_string())
        }
    }

    block_on_test(async {
        let provider = MockProvider::failing(HttpError::new("Boom", 500));
        let sink = RecordingSink::default();
        let plain = context_for(&provider, &sink, &RecordingErrors::default());

        let _ = custom_mutation::<Value, Value>(
            &plain,
            UseCustomMutationParams::new("/publish", HttpMethod::Post, json!({ "id": 1 })),
        )
        .expect("provider supports custom")
        .await;

        let translated = DataConfig::new(entry(&provider))
            .with_notification(sink.clone())
            .with_i18n(French)
            .build();
        let _ = custom_mutation::<Value, Value>(
            &translated,
            UseCustomMutationParams::new("/publish", HttpMethod::Post, json!({ "id": 1 })),
        )
        .expect("provider supports custom")
        .await;

        let opened = sink.opened.borrow();
        assert_eq!(opened.len(), 2);
        assert_eq!(opened[0].message, "Error (status code: 500)");
        assert_eq!(opened[0].key.as_deref(), Some("post-notification"));
        assert_eq!(opened[1].message, "Erreur (code : 500)");
    });
}

#[test]
fn custom_mutation_success_is_silent_without_request() {
    block_on_test(async {
        let provider = MockProvider::new(0);
        let sink = RecordingSink::default();
        let context = context_for(&provider, &sink, &RecordingErrors::default());

        let response = custom_mutation::<Value, Value>(
            &context,
            UseCustomMutationParams::new("/publish", HttpMethod::Post, Value::Null),
        )
        .expect("provider supports custom")
        .await
        .expect("custom succeeds");

        assert_eq!(response.data, json!({ "url": "/publish", "payload": null }));
        assert!(sink.opened.borrow().is_empty());
    });
}

#[test]
fn invalidate_requires_known_provider() {
    let context = DataConfig::new(DataProviderEntry::new(MockProvider::new(0))).build();
    let params = InvalidateParams::new([Invalidation::All]).data_provider_name("archive");
    assert_eq!(
        invalidate(&context, &params),
        Err(ConfigError::ProviderNotFound("archive".to_string()))
    );
}

#[test]
fn custom_mutation_error_callback_sees_config_and_meta() {
    block_on_test(async {
        let provider = MockProvider::failing(HttpError::new("Nope", 422));
        let sink = RecordingSink::default();
        let context = context_for(&provider, &sink, &RecordingErrors::default());

        let mut config = CustomConfig::default();
        config.query = Some(json!({ "draft": true }));
        let mut meta = MetaQuery::new();
        meta.insert("tenant".to_string(), json!("acme"));

        let _ = custom_mutation::<Value, Value>(
            &context,
            UseCustomMutationParams::new("/publish", HttpMethod::Post, json!({ "id": 1 }))
                .config(config)
                .meta(meta)
                .error_notification(NotificationProp::with(|error: &HttpError, variables: &BaseRecord, _resource| {
                    OpenNotificationParams::error(format!(
                        "{} for {} ({})",
                        error.status_code, variables["tenant"], variables["query"]["draft"]
                    ))
                    .into()
                })),
        )
        .expect("provider supports custom")
        .await;

        assert_eq!(sink.opened.borrow()[0].message, r#"422 for "acme" (true)"#);
    });
}
