//! Integration tests for presenters, nested projection and transformers

use presento::{
    Fallback, HookTable, NestedRule, OutputMode, Present, Presenter, PresentoError,
    ProjectionLimits, Registry, RuleSet, Transformer,
};
use presento_test_utils::{init_tracing, nested_chain, null_fields, sample_user};
use serde_json::{json, Value};
use std::sync::Arc;

struct ComplexPresenter;

impl Present for ComplexPresenter {
    fn present(&self) -> RuleSet {
        RuleSet::new()
            .field("id")
            .field("name")
            .field("email")
            .field("type")
            .field("is_active")
            .field("projects")
    }
}

struct DatatablePresenter;

impl Present for DatatablePresenter {
    fn present(&self) -> RuleSet {
        RuleSet::from_value(&json!(["id", "name", "email", "type", "is_active"]))
            .unwrap_or_default()
    }

    fn mode(&self) -> OutputMode {
        OutputMode::Positional
    }
}

struct UserTransformer;

impl Transformer for UserTransformer {
    fn hooks(&self, table: &mut HookTable) {
        table.on("UserId", |value, _| json!(-value.as_i64().unwrap_or_default()));
    }
}

struct AliasPresenter;

impl Present for AliasPresenter {
    fn present(&self) -> RuleSet {
        RuleSet::new()
            .alias("user_id", "id")
            .field("name")
            .field("email")
            .field("type")
            .field("is_active")
            .alias("top_package", "projects.0.name")
    }

    fn transformer(&self) -> Option<&str> {
        Some("UserTransformer")
    }
}

struct NonExistingFieldsPresenter;

impl Present for NonExistingFieldsPresenter {
    fn present(&self) -> RuleSet {
        RuleSet::new().field("name").field("email")
    }
}

struct ProjectPresenter;

impl Present for ProjectPresenter {
    fn present(&self) -> RuleSet {
        RuleSet::new().field("name").alias("link", "url")
    }
}

/// Presents a list of projects by delegating each entry
struct ProjectListPresenter;

impl Present for ProjectListPresenter {
    fn present(&self) -> RuleSet {
        RuleSet::new()
            .nested("first", NestedRule::new("Project").at("0"))
            .nested("second", NestedRule::new("Project").at("1"))
    }
}

struct ProfilePresenter;

impl Present for ProfilePresenter {
    fn present(&self) -> RuleSet {
        RuleSet::new()
            .alias("user_id", "id")
            .nested("projects", NestedRule::new("ProjectList").at("projects"))
            .nested(
                "owner",
                NestedRule::new("Owner").with_transformer("UserTransformer"),
            )
    }
}

struct OwnerPresenter;

impl Present for OwnerPresenter {
    fn present(&self) -> RuleSet {
        RuleSet::new().alias("user_id", "id").field("email")
    }
}

/// Refers back to itself through the `child` field
struct TreePresenter;

impl Present for TreePresenter {
    fn present(&self) -> RuleSet {
        RuleSet::new()
            .field("level")
            .nested("child", NestedRule::new("Tree").at("child"))
    }

    fn fallback(&self) -> Fallback {
        Fallback::value(json!("end"))
    }
}

/// Prefixes names with its constructor argument
struct LabelPresenter {
    prefix: String,
}

impl Present for LabelPresenter {
    fn present(&self) -> RuleSet {
        RuleSet::new().field("name")
    }

    fn map(&self, data: Value) -> Value {
        let name = data["name"].as_str().unwrap_or_default();
        json!({ "name": format!("{}{}", self.prefix, name) })
    }
}

fn registry() -> Arc<Registry> {
    init_tracing();

    let registry = Arc::new(Registry::new());
    registry
        .register_transformer("UserTransformer", Arc::new(UserTransformer))
        .unwrap();
    registry
        .register_presenter("Project", |_| Ok(ProjectPresenter))
        .unwrap();
    registry
        .register_presenter("ProjectList", |_| Ok(ProjectListPresenter))
        .unwrap();
    registry
        .register_presenter("Owner", |_| Ok(OwnerPresenter))
        .unwrap();
    registry
        .register_presenter("Tree", |_| Ok(TreePresenter))
        .unwrap();
    registry
        .register_presenter_with_arity("Label", 1..=1, |args| {
            Ok(LabelPresenter {
                prefix: args[0].as_str().unwrap_or_default().to_string(),
            })
        })
        .unwrap();
    registry
}

#[test]
fn presenter_returns_only_selected_fields() {
    let mut presenter = Presenter::new(ComplexPresenter, sample_user()).in_registry(registry());
    let user = sample_user();
    let expected = json!({
        "id": 123456,
        "name": "Nahid Bin Azhar",
        "email": "talk@nahid.im",
        "type": 1,
        "is_active": 1,
        "projects": user["projects"].clone(),
    });
    assert_eq!(presenter.get().unwrap(), &expected);
}

#[test]
fn datatable_presenter_returns_values_in_schema_order() {
    let mut presenter = Presenter::new(DatatablePresenter, sample_user()).in_registry(registry());
    assert_eq!(
        presenter.get().unwrap(),
        &json!([123456, "Nahid Bin Azhar", "talk@nahid.im", 1, 1])
    );
}

#[test]
fn alias_presenter_with_transformer() {
    let mut presenter = Presenter::new(AliasPresenter, sample_user()).in_registry(registry());
    assert_eq!(
        presenter.get().unwrap(),
        &json!({
            "user_id": -123456,
            "name": "Nahid Bin Azhar",
            "email": "talk@nahid.im",
            "type": 1,
            "is_active": 1,
            "top_package": "Laravel Talk",
        })
    );
}

#[test]
fn presenter_returns_non_existing_fields_as_null() {
    let mut presenter =
        Presenter::new(NonExistingFieldsPresenter, json!({"id": 1})).in_registry(registry());
    assert_eq!(presenter.get().unwrap(), &json!({"name": null, "email": null}));

    // Null fields still make a non-blank record, so no fallback applies
    let mut presenter = Presenter::new(NonExistingFieldsPresenter, null_fields(&["name", "email"]))
        .in_registry(registry());
    assert_eq!(presenter.to_json().unwrap(), r#"{"name":null,"email":null}"#);
}

#[test]
fn end_to_end_keyed_and_positional_text() {
    struct Keyed;
    impl Present for Keyed {
        fn present(&self) -> RuleSet {
            RuleSet::new().field("id").field("name")
        }
    }

    struct Positional;
    impl Present for Positional {
        fn present(&self) -> RuleSet {
            RuleSet::new().field("id").field("name")
        }
        fn mode(&self) -> OutputMode {
            OutputMode::Positional
        }
    }

    let data = json!({"id": 123456, "name": "Nahid"});
    let mut keyed = Presenter::new(Keyed, data.clone());
    let mut positional = Presenter::new(Positional, data);
    assert_eq!(keyed.to_json().unwrap(), r#"{"id":123456,"name":"Nahid"}"#);
    assert_eq!(positional.to_json().unwrap(), r#"[123456,"Nahid"]"#);
}

#[test]
fn nested_projection_matches_independent_presenter() {
    let registry = registry();
    let mut profile = Presenter::new(ProfilePresenter, sample_user()).in_registry(registry.clone());
    let output = profile.get().unwrap().clone();

    let mut list = Presenter::new(ProjectListPresenter, sample_user()["projects"].clone())
        .in_registry(registry.clone());
    assert_eq!(output["projects"], *list.get().unwrap());

    let mut owner = Presenter::with_transformer(OwnerPresenter, sample_user(), Some("UserTransformer"))
        .in_registry(registry);
    assert_eq!(output["owner"], *owner.get().unwrap());

    assert_eq!(
        output,
        json!({
            "user_id": 123456,
            "projects": {
                "first": {"name": "Laravel Talk", "link": "https://github.com/nahid/talk"},
                "second": {"name": "JsonQ", "link": "https://github.com/nahid/jsonq"},
            },
            "owner": {"user_id": -123456, "email": "talk@nahid.im"},
        })
    );
}

#[test]
fn nested_presenter_receives_extra_arguments() {
    struct Labelled;
    impl Present for Labelled {
        fn present(&self) -> RuleSet {
            RuleSet::from_json_str(r##"{"top": {"Label": ["projects.0", null, "#"]}}"##)
                .unwrap_or_default()
        }
    }

    let mut presenter = Presenter::new(Labelled, sample_user()).in_registry(registry());
    assert_eq!(presenter.get().unwrap(), &json!({"top": {"name": "#Laravel Talk"}}));
}

#[test]
fn nested_presenter_with_wrong_arity_fails() {
    struct Unlabelled;
    impl Present for Unlabelled {
        fn present(&self) -> RuleSet {
            RuleSet::new().nested("top", NestedRule::new("Label"))
        }
    }

    let mut presenter = Presenter::new(Unlabelled, sample_user()).in_registry(registry());
    let err = presenter.get().unwrap_err();
    assert!(err.is_factory_resolution());
    assert!(matches!(err, PresentoError::PresenterArity { found: 0, .. }));
}

#[test]
fn unknown_nested_presenter_propagates() {
    struct Dangling;
    impl Present for Dangling {
        fn present(&self) -> RuleSet {
            RuleSet::new().nested("x", NestedRule::new("Nowhere"))
        }
    }

    let mut presenter = Presenter::new(Dangling, json!({"a": 1})).in_registry(registry());
    assert!(matches!(
        presenter.get(),
        Err(PresentoError::UnknownPresenter { ref name }) if name == "Nowhere"
    ));
}

#[test]
fn inert_identifier_emits_rule_literal() {
    struct WithInert;
    impl Present for WithInert {
        fn present(&self) -> RuleSet {
            RuleSet::new().nested("meta", NestedRule::new("Plain").at("id"))
        }
    }

    let registry = registry();
    registry.register_inert("Plain").unwrap();
    let mut presenter = Presenter::new(WithInert, json!({"id": 1})).in_registry(registry);
    assert_eq!(
        presenter.get().unwrap(),
        &json!({"meta": {"Plain": ["id", null]}})
    );
}

#[test]
fn inert_identifier_in_json_schema_echoes_rule_as_written() {
    struct JsonInert;
    impl Present for JsonInert {
        fn present(&self) -> RuleSet {
            RuleSet::from_value(&json!({"meta": {"Plain": ["id"]}, "id": "id"})).unwrap_or_default()
        }
    }

    let registry = registry();
    registry.register_inert("Plain").unwrap();
    let mut presenter = Presenter::new(JsonInert, json!({"id": 1})).in_registry(registry);
    assert_eq!(
        presenter.get().unwrap(),
        &json!({"meta": {"Plain": ["id"]}, "id": 1})
    );
}

#[test]
fn self_referential_schema_terminates_on_blank_leaf() {
    let mut presenter = Presenter::new(TreePresenter, nested_chain(3)).in_registry(registry());
    assert_eq!(
        presenter.get().unwrap(),
        &json!({
            "level": 0,
            "child": {
                "level": 1,
                "child": {
                    "level": 2,
                    "child": {"level": null, "child": "end"}
                }
            }
        })
    );
}

#[test]
fn self_referential_schema_hits_depth_guard() {
    let presenter = Presenter::new(TreePresenter, nested_chain(10))
        .in_registry(registry())
        .with_limits(ProjectionLimits {
            max_nesting_depth: 4,
        });
    let mut presenter = presenter.unwrap();

    assert!(matches!(
        presenter.get(),
        Err(PresentoError::NestingDepthExceeded { depth: 5, max_depth: 4, .. })
    ));
}

#[test]
fn misconfigured_naming_strategy_fails_before_hooks() {
    struct Strict;
    impl Transformer for Strict {
        fn naming_strategy(&self) -> Option<&str> {
            Some("to_snake_case")
        }
        fn hooks(&self, table: &mut HookTable) {
            table.on("Id", |_, _| panic!("hook must not run"));
        }
    }

    let registry = registry();
    registry.register_transformer("Strict", Arc::new(Strict)).unwrap();

    let mut presenter =
        Presenter::with_transformer(NonExistingFieldsPresenter, json!({"id": 1}), Some("Strict"))
            .in_registry(registry);
    let err = presenter.get().unwrap_err();
    assert!(err.is_configuration());
    assert!(matches!(err, PresentoError::UnknownNamingStrategy { .. }));
}

#[test]
fn set_transformer_before_first_get_takes_effect() {
    let mut presenter = Presenter::new(AliasPresenter, sample_user()).in_registry(registry());
    presenter.set_transformer(None::<String>);
    assert_eq!(presenter.get().unwrap()["user_id"], json!(123456));

    presenter.set_transformer(Some("UserTransformer"));
    assert_eq!(presenter.get().unwrap()["user_id"], json!(123456));
    assert_eq!(presenter.reprocess().unwrap()["user_id"], json!(-123456));
}

#[test]
fn blank_input_with_fallback_schema() {
    struct Defaulted;
    impl Present for Defaulted {
        fn present(&self) -> RuleSet {
            RuleSet::new().field("id")
        }
        fn fallback(&self) -> Fallback {
            Fallback::schema(RuleSet::new().literal("id", json!(0)).literal("name", json!("guest")))
        }
    }

    let mut presenter = Presenter::new(Defaulted, json!({})).in_registry(registry());
    assert_eq!(presenter.get().unwrap(), &json!({"id": 0, "name": "guest"}));

    let mut presenter = Presenter::new(Defaulted, json!("   ")).in_registry(registry());
    assert_eq!(presenter.get().unwrap(), &json!({"id": 0, "name": "guest"}));
}

#[test]
fn present_helper_runs_once() {
    let output = presento::present(ComplexPresenter, json!({"id": 1})).unwrap();
    assert_eq!(output["id"], json!(1));
    assert_eq!(output["projects"], Value::Null);
}
