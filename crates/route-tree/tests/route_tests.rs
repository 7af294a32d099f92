//! Integration tests for single routes and route groups
//!
//! Covers:
//! - Construction and metadata
//! - Matching (requirements, inline types, optional segments, groups)
//! - Attribute inheritance through groups
//! - Path generation
//! - Serialization

use pretty_assertions::assert_eq;
use route_tree::*;
use rstest::rstest;
use serde_json::json;

fn get(path: &str) -> ServerRequest {
    ServerRequest::get(path)
}

fn attributes(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_metadata() {
    let mut route = Route::builder("/my-path/{foo}/{bar}")
        .name("my-route")
        .methods(["POST", "GET", "PUT"])
        .option("option", true)
        .context(json!({ "controller": "TestController" }))
        .build()
        .unwrap();

    assert_eq!(route.name(), Some("my-route"));
    assert_eq!(route.path(), "/my-path/{foo}/{bar}");
    assert_eq!(route.methods(), vec!["POST", "GET", "PUT"]);
    assert_eq!(route.options(), &json!({ "option": true }).as_object().cloned().unwrap());
    assert_eq!(route.option("option"), Some(&json!(true)));
    assert_eq!(route.option("unknown"), None);
    assert_eq!(route.context(), &json!({ "controller": "TestController" }));

    route.set_context(json!({ "controller": "Other", "function": "run" }));
    assert_eq!(route.context()["function"], json!("run"));
}

#[test]
fn test_explicit_methods_are_not_filtered() {
    let route = Route::builder("/").method("patch").build().unwrap();
    assert_eq!(route.methods(), vec!["PATCH"]);

    let request = ServerRequest::new("PATCH", "/");
    assert!(route.test(&request).is_some());
}

#[test]
fn test_uuid_type_still_resolves() {
    // shows the deprecation warning with --nocapture
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let uuid = Route::new("/my-path/{foo::uuid}").unwrap();
    let uuid4 = Route::new("/my-path/{foo::uuid4}").unwrap();

    for path in [
        "/my-path/8bd71855-5e84-4a0e-9595-98a5f180840d",
        "/my-path/8BD71855-5E84-4A0E-9595-98A5F180840D",
        "/my-path/8bd71855-5e84-4a0e-9595",
        "/my-path/not-a-uuid",
    ] {
        assert_eq!(uuid.test(&get(path)), uuid4.test(&get(path)), "{}", path);
    }
    assert!(uuid.test(&get("/my-path/8bd71855-5e84-4a0e-9595-98a5f180840d")).is_some());
}

// ============================================================================
// Matching
// ============================================================================

#[rstest]
#[case("/my-path/1value1/value2", true)]
#[case("/my-path/1va/lue1/value2", false)]
#[case("/MY-PATH/v1/v2", true)]
#[case("/my-path/v1", false)]
#[case("/my-path/v1/v2/", false)]
fn test_match_placeholders(#[case] path: &str, #[case] expected: bool) {
    let route = Route::new("/my-path/{foo}/{bar}").unwrap();
    assert_eq!(route.test(&get(path)).is_some(), expected);
}

#[rstest]
#[case("/my-path/123/value2", true)]
#[case("/my-path/12-3/value2", false)]
#[case("/my-path/123/valu/e2", true)]
#[case("/my-path/123/", false)]
fn test_match_requirements(#[case] path: &str, #[case] expected: bool) {
    let route = Route::builder("/my-path/{foo}/{bar}")
        .requirements([("foo", r"\d+"), ("bar", ".+")])
        .build()
        .unwrap();
    assert_eq!(route.test(&get(path)).is_some(), expected);
}

#[test]
fn test_requirement_may_allow_empty_value() {
    let route = Route::builder("/my-path/{foo}/{bar}")
        .requirements([("foo", r"\d+"), ("bar", ".*")])
        .build()
        .unwrap();

    assert_eq!(route.test(&get("/my-path/123/")), Some(attributes(&[("foo", "123"), ("bar", "")])));
    assert!(route.test(&get("/my-path/123/value2")).is_some());
}

#[rstest]
#[case("/my-path/{foo::int}/{bar}")]
#[case("/my-path/{foo:\\d+}/{bar}")]
fn test_inline_requirements(#[case] template: &str) {
    let route = Route::new(template).unwrap();
    assert!(route.test(&get("/my-path/123/value2")).is_some());
    assert!(route.test(&get("/my-path/12-3/value2")).is_none());
}

#[test]
fn test_inline_regex_with_braces() {
    let route = Route::new("/zip/{code:\\d{5}}").unwrap();
    assert_eq!(route.local_path(), "/zip/{code}");
    assert!(route.test(&get("/zip/75001")).is_some());
    assert!(route.test(&get("/zip/7500")).is_none());
}

#[test]
fn test_extracted_attributes() {
    let route = Route::new("/my-path/{foo}/{bar}").unwrap();
    assert_eq!(
        route.test(&get("/my-path/value1/value2")),
        Some(attributes(&[("foo", "value1"), ("bar", "value2")]))
    );
}

#[test]
fn test_literal_text_is_not_a_pattern() {
    let route = Route::new("/files/report.pdf").unwrap();
    assert!(route.test(&get("/files/report.pdf")).is_some());
    assert!(route.test(&get("/files/reportXpdf")).is_none());
}

#[test]
fn test_optional_part() {
    let route = Route::new("/my-path/{foo}[/{bar}]").unwrap();

    assert_eq!(route.test(&get("/my-path/value1")), Some(attributes(&[("foo", "value1")])));
    assert_eq!(
        route.test(&get("/my-path/value1/value2")),
        Some(attributes(&[("foo", "value1"), ("bar", "value2")]))
    );
}

#[rstest]
#[case("/my-path/value1", Some(&[("foo", "value1")][..]))]
#[case("/my-path/value1/value2", None)]
#[case(
    "/my-path/value1/value2/value3",
    Some(&[("foo", "value1"), ("bar", "value2"), ("baz", "value3")][..])
)]
fn test_optional_part_with_two_attributes(
    #[case] path: &str,
    #[case] expected: Option<&[(&str, &str)]>,
) {
    let route = Route::new("/my-path/{foo}[/{bar}/{baz}]").unwrap();
    assert_eq!(route.test(&get(path)), expected.map(attributes));
}

#[rstest]
#[case("/my-path/value1", &[("foo", "value1")])]
#[case("/my-path/value1/sub-path/value3", &[("foo", "value1"), ("baz", "value3")])]
#[case(
    "/my-path/value1/value2/sub-path/value3",
    &[("foo", "value1"), ("bar", "value2"), ("baz", "value3")]
)]
fn test_nested_optional_part(#[case] path: &str, #[case] expected: &[(&str, &str)]) {
    let route = Route::new("/my-path/{foo}[[/{bar}]/sub-path/{baz}]").unwrap();
    assert_eq!(route.test(&get(path)), Some(attributes(expected)));
}

#[test]
fn test_host_restriction() {
    let route = Route::builder("/").host("Example.com").build().unwrap();

    assert!(route.test(&get("http://example.com/")).is_some());
    assert!(route.test(&get("http://EXAMPLE.com/")).is_some());
    assert!(route.test(&get("http://other.com/")).is_none());
    assert!(route.test(&get("/")).is_none());
}

#[test]
fn test_encoded_slash_stays_in_its_segment() {
    let route = Route::new("/my-path/{foo}/{bar}").unwrap();
    let path = route.generate(&[("foo", "foo%2Fbar"), ("bar", "value2")]).unwrap();

    assert_eq!(path, "/my-path/foo%2Fbar/value2");
    assert_eq!(
        route.test(&get(&path)),
        Some(attributes(&[("foo", "foo%2Fbar"), ("bar", "value2")]))
    );
    assert!(route.test(&get(&format!("http://example.com{}", path))).is_some());
}

#[rstest]
#[case("/my-path/{foo}/{bar}", "a%20b")]
#[case("/my-path/{foo:[a-z%0-9]+}/{bar}", "a%2fb")]
#[case("/my-path/{foo::slug}/{bar}", "a-b")]
fn test_generated_path_matches(#[case] template: &str, #[case] value: &str) {
    let route = Route::new(template).unwrap();
    let path = route.generate(&[("foo", value), ("bar", "x")]).unwrap();
    assert_eq!(route.test(&get(&path)).unwrap()["foo"], value);
}

// ============================================================================
// Groups and inheritance
// ============================================================================

#[test]
fn test_group_never_matches() {
    let parent = Route::builder("/path/{foo}")
        .requirement("bar", r"\d+")
        .route(Route::builder("/sub-path/{bar}").default("foo", "value").build().unwrap())
        .build()
        .unwrap();
    let child = parent.routes().next().unwrap();

    assert!(parent.is_group());
    assert!(parent.test(&get("/path/value/sub-path/123")).is_none());
    assert!(child.test(&get("/path/value/sub-path/123")).is_some());
    assert!(child.test(&get("/path/value/sub-path/abc")).is_none());
}

#[test]
fn test_nested_groups_are_flattened() {
    let parent = Route::builder("/path/{foo}")
        .route(Route::builder("/sub-path/{bar}").default("foo", "value").build().unwrap())
        .route(
            Route::builder("/path2/{foo2}")
                .route(Route::new("/sub-path2/{bar}").unwrap())
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let paths: Vec<String> = parent.routes().map(Route::path).collect();
    assert_eq!(
        paths,
        vec!["/path/{foo}/sub-path/{bar}", "/path/{foo}/path2/{foo2}/sub-path2/{bar}"]
    );
    assert_eq!(parent.count(), 2);
}

#[test]
fn test_attribute_lookup_walks_ancestors() {
    let root = Route::builder("/{lang}")
        .default("lang", "en")
        .requirement("lang", "[a-z]{2}")
        .route(
            Route::builder("/docs")
                .requirement("lang", "en|fr")
                .route(Route::builder("/{page}").default("lang", "fr").build().unwrap())
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let page = root.routes().next().unwrap();

    let lang = page.attribute("lang").unwrap();
    assert_eq!(lang.default(), Some(&json!("fr")));
    assert_eq!(lang.regex(), Some("en|fr"));
    assert!(page.attribute("page").unwrap().regex().is_none());
    assert!(page.attribute("unknown").is_none());

    assert!(page.test(&get("/fr/docs/intro")).is_some());
    assert!(page.test(&get("/de/docs/intro")).is_none());
    assert!(page.generate(&()).is_err());
    assert_eq!(page.generate(&[("page", "intro")]).unwrap(), "/fr/docs/intro");
}

#[test]
fn test_hosts_are_not_inherited() {
    let group = Route::builder("/admin")
        .host("admin.example.com")
        .route(Route::new("/users").unwrap())
        .build()
        .unwrap();
    let users = group.routes().next().unwrap();

    assert_eq!(users.hosts(), None);
    assert!(users.test(&get("http://admin.example.com/admin/users")).is_some());
    assert!(users.test(&get("http://www.example.com/admin/users")).is_some());
    assert!(users.test(&get("/admin/users")).is_some());
}

#[test]
fn test_options_are_inherited() {
    let group = Route::builder("/admin")
        .option("layout", "admin")
        .option("auth", true)
        .route(Route::builder("/login").option("auth", false).build().unwrap())
        .build()
        .unwrap();
    let login = group.routes().next().unwrap();

    assert_eq!(login.option("layout"), Some(&json!("admin")));
    assert_eq!(login.option("auth"), Some(&json!(false)));
    assert_eq!(login.options().len(), 1);
}

#[test]
fn test_reparenting_recompiles() {
    let child = Route::new("/{id}").unwrap();
    assert!(child.test(&get("/42")).is_some());

    let group = Route::builder("/items").route(child).build().unwrap();
    let child = group.routes().next().unwrap();
    assert!(child.test(&get("/42")).is_none());
    assert!(child.test(&get("/items/42")).is_some());
}

// ============================================================================
// Generation
// ============================================================================

#[rstest]
#[case(json!({ "foo": "value1", "bar": "value2" }), "/my-path/value1/value2")]
#[case(json!({ "foo": "foo/bar", "bar": "value2" }), "/my-path/foo/bar/value2")]
#[case(json!({ "foo": "v1", "bar": "v2", "c": "v3" }), "/my-path/v1/v2?c=v3")]
#[case(json!({ "foo": 1, "bar": true }), "/my-path/1/1")]
fn test_generate(#[case] parameters: serde_json::Value, #[case] expected: &str) {
    let route = Route::new("/my-path/{foo}/{bar}").unwrap();
    assert_eq!(route.generate(&parameters).unwrap(), expected);
}

#[test]
fn test_generate_then_test() {
    let route = Route::new("/my-path/{foo::int}/{bar::slug}").unwrap();
    let path = route.generate(&[("foo", json!(12)), ("bar", json!("a-b"))]).unwrap();

    assert_eq!(
        route.test(&get(&path)),
        Some(attributes(&[("foo", "12"), ("bar", "a-b")]))
    );
}

#[test]
fn test_static_route_generation() {
    let route = Route::new("/about/team").unwrap();
    assert_eq!(route.generate(&()).unwrap(), "/about/team");
    assert!(route.test(&get("/About/Team")).is_some());
    assert!(route.test(&get("/about/team2")).is_none());
}

#[test]
fn test_generate_with_default_attribute() {
    let route = Route::builder("/my-path/{foo}/{bar}")
        .default("foo", "value1")
        .build()
        .unwrap();
    assert_eq!(route.generate(&[("bar", "value2")]).unwrap(), "/my-path/value1/value2");
}

#[test]
fn test_generate_with_missing_attribute() {
    let route = Route::builder("/my-path/{foo}/{bar}")
        .default("foo", "value1")
        .build()
        .unwrap();

    match route.generate(&()) {
        Err(RoutingError::MissingAttributes { names, route }) => {
            assert_eq!(names, vec!["bar".to_string()]);
            assert_eq!(route, None);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_generate_with_multidimensional_parameters() {
    let route = Route::builder("/my-path/{foo}/{bar}")
        .default("foo", "bar")
        .name("my-route")
        .method("get")
        .build()
        .unwrap();
    let parameters = json!({
        "baz": ["bar", "baz", "", null, 0],
        "qux": "",
        "quxx": null,
        "foo": "value1",
        "bar": "value2"
    });

    let path = route.generate(&parameters).unwrap();
    assert_eq!(
        path,
        "/my-path/value1/value2?baz%5B0%5D=bar&baz%5B1%5D=baz&baz%5B2%5D=&baz%5B4%5D=0&qux="
    );
    assert!(route.test(&get(&path)).is_some());
}

#[test]
fn test_generate_with_parent_route() {
    let parent = Route::builder("/path/{foo}")
        .requirement("bar", r"\d+")
        .route(Route::builder("/sub-path/{bar}").default("foo", "value").build().unwrap())
        .build()
        .unwrap();
    let child = parent.routes().next().unwrap();

    assert_eq!(child.generate(&[("bar", "123")]).unwrap(), "/path/value/sub-path/123");
}

#[test]
fn test_generate_with_parent_route_and_empty_path() {
    let parent = Route::builder("")
        .requirement("bar", r"\d+")
        .route(Route::new("/sub-path/{bar}").unwrap())
        .build()
        .unwrap();
    let child = parent.routes().next().unwrap();

    assert_eq!(child.generate(&[("bar", "123")]).unwrap(), "/sub-path/123");
}

#[rstest]
#[case(json!({ "foo": "value1" }), "/my-path/value1")]
#[case(json!({ "foo": "value1", "bar": null }), "/my-path/value1")]
#[case(json!({ "foo": "value1", "bar": "value2" }), "/my-path/value1/value2")]
fn test_generate_with_optional_part(#[case] parameters: serde_json::Value, #[case] expected: &str) {
    let route = Route::new("/my-path/{foo}[/{bar}]").unwrap();
    assert_eq!(route.generate(&parameters).unwrap(), expected);
}

#[rstest]
#[case(json!({ "foo": "value1" }), "/my-path/value1")]
#[case(json!({ "foo": "value1", "bar": "value2" }), "/my-path/value1")]
#[case(
    json!({ "foo": "value1", "bar": "value2", "baz": "value3" }),
    "/my-path/value1/value2/value3"
)]
fn test_generate_with_optional_part_with_two_attributes(
    #[case] parameters: serde_json::Value,
    #[case] expected: &str,
) {
    let route = Route::new("/my-path/{foo}[/{bar}/{baz}]").unwrap();
    assert_eq!(route.generate(&parameters).unwrap(), expected);
}

#[rstest]
#[case(json!({ "foo": "value1" }), "/my-path/value1")]
#[case(json!({ "foo": "value1", "baz": "value3" }), "/my-path/value1/sub-path/value3")]
#[case(
    json!({ "foo": "value1", "bar": "value2", "baz": "value3" }),
    "/my-path/value1/value2/sub-path/value3"
)]
fn test_generate_with_nested_optional_part(#[case] parameters: serde_json::Value, #[case] expected: &str) {
    let route = Route::new("/my-path/{foo}[[/{bar}]/sub-path/{baz}]").unwrap();
    assert_eq!(route.generate(&parameters).unwrap(), expected);
}

#[test]
fn test_generate_with_nested_optional_part_and_default_value() {
    let route = Route::builder("/p/{a}[[/{b}]/sub/{c}]")
        .default("c", "d")
        .build()
        .unwrap();
    assert_eq!(route.generate(&[("a", "x")]).unwrap(), "/p/x/sub/d");
}

#[test]
fn test_generate_scored() {
    let route = Route::builder("/p/{a}[/{b}]").default("b", "d").build().unwrap();

    let generated = route.generate_scored(&[("a", "x")]).unwrap();
    assert_eq!(generated, GeneratedPath { path: "/p/x/d".to_string(), consumed: 1 });

    let generated = route.generate_scored(&[("a", "x"), ("b", "y"), ("c", "z")]).unwrap();
    assert_eq!(generated.path, "/p/x/y?c=z");
    assert_eq!(generated.consumed, 2);
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_serialization_round_trip() {
    let route = Route::builder("/my-path/{foo}/{bar}")
        .defaults([("foo", json!("value")), ("bar", json!(false)), ("baz", json!("default"))])
        .requirement("foo", r"\d+")
        .name("my-route")
        .method("GET")
        .host("shop.example.com")
        .priority(100)
        .option("option", true)
        .context(json!({ "controller": "TestController" }))
        .build()
        .unwrap();

    let serialized = serde_json::to_string(&route).unwrap();
    let restored: Route = serde_json::from_str(&serialized).unwrap();

    assert_eq!(restored, route);
    assert_eq!(restored.attribute("foo").unwrap().regex(), Some(r"\d+"));
}

#[test]
fn test_deserialized_tree_is_relinked() {
    let group = Route::builder("/path/{foo}")
        .requirement("bar", r"\d+")
        .option("layout", "main")
        .route(Route::builder("/sub-path/{bar}").default("foo", "value").build().unwrap())
        .build()
        .unwrap();

    let restored: Route = serde_json::from_value(serde_json::to_value(&group).unwrap()).unwrap();
    assert_eq!(restored, group);

    let child = restored.routes().next().unwrap();
    assert_eq!(child.path(), "/path/{foo}/sub-path/{bar}");
    assert_eq!(child.option("layout"), Some(&json!("main")));
    assert!(child.test(&get("/path/value/sub-path/123")).is_some());
    assert!(child.test(&get("/path/value/sub-path/abc")).is_none());
    assert_eq!(child.generate(&[("bar", 5)]).unwrap(), "/path/value/sub-path/5");
}
