use kson_core::message::Severity;
use kson_core::{parse_schema, MessageKind, SchemaValidator};

fn validator(schema: &str) -> SchemaValidator {
    let parsed = parse_schema(schema);
    // Advisory warnings (e.g. format checks) are fine; errors are not.
    assert!(
        !parsed.messages.iter().any(|m| m.severity == Severity::Error),
        "schema produced errors: {:?}",
        parsed.messages
    );
    parsed.validator.expect("schema parses")
}

fn errors_of(schema: &str, doc: &str) -> Vec<kson_core::Message> {
    validator(schema)
        .validate(doc)
        .into_iter()
        .filter(|m| m.severity == Severity::Error)
        .collect()
}

// ============================================================================
// Core keywords
// ============================================================================

#[test]
fn required_property_missing() {
    let schema = "{type: object, properties: {name: {type: string}, age: {type: number}}, required: [name, age]}";
    let errors = errors_of(schema, "{name: 'John'}");
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(errors[0].kind, MessageKind::SchemaRequiredPropertyMissing);
    assert_eq!(errors[0].params, vec!["age".to_string()]);
}

#[test]
fn type_mismatch() {
    assert_eq!(errors_of("{type: string}", "42").len(), 1);
    assert!(errors_of("{type: string}", "'text'").is_empty());
    assert!(errors_of("{type: [string, 'null']}", "null").is_empty());
}

#[test]
fn integer_vs_number() {
    // Every integer is a number.
    assert!(errors_of("{type: number}", "3").is_empty());
    // 1.5 is not an integer; 2.0 has a fractional source form.
    assert_eq!(errors_of("{type: integer}", "1.5").len(), 1);
    assert_eq!(errors_of("{type: integer}", "2.0").len(), 1);
    assert!(errors_of("{type: integer}", "7").is_empty());
}

#[test]
fn numeric_bounds() {
    let schema = "{minimum: 0, maximum: 10}";
    assert!(errors_of(schema, "5").is_empty());
    assert_eq!(errors_of(schema, "-1")[0].kind, MessageKind::SchemaMinimumViolation);
    assert_eq!(errors_of(schema, "11")[0].kind, MessageKind::SchemaMaximumViolation);
    assert_eq!(
        errors_of("{exclusiveMinimum: 0}", "0")[0].kind,
        MessageKind::SchemaExclusiveMinimumViolation
    );
    assert_eq!(
        errors_of("{multipleOf: 3}", "10")[0].kind,
        MessageKind::SchemaMultipleOfViolation
    );
    assert!(errors_of("{multipleOf: 3}", "9").is_empty());
}

#[test]
fn string_constraints() {
    assert_eq!(
        errors_of("{minLength: 3}", "'ab'")[0].kind,
        MessageKind::SchemaMinLengthViolation
    );
    assert!(errors_of("{maxLength: 3}", "'abc'").is_empty());
    assert_eq!(
        errors_of("{pattern: '^a+$'}", "'bbb'")[0].kind,
        MessageKind::SchemaPatternMismatch
    );
    assert!(errors_of("{pattern: '^a+$'}", "'aaa'").is_empty());
    // An invalid pattern is skipped, never fatal.
    assert!(errors_of("{pattern: '(unclosed'}", "'whatever'").is_empty());
}

#[test]
fn enum_and_const() {
    let schema = "{enum: [red, green, 3]}";
    assert!(errors_of(schema, "'green'").is_empty());
    assert!(errors_of(schema, "3").is_empty());
    assert_eq!(errors_of(schema, "'blue'")[0].kind, MessageKind::SchemaEnumMismatch);
    assert_eq!(
        errors_of("{const: 5}", "6")[0].kind,
        MessageKind::SchemaConstMismatch
    );
}

#[test]
fn array_constraints() {
    assert_eq!(
        errors_of("{minItems: 2}", "[1]")[0].kind,
        MessageKind::SchemaMinItemsViolation
    );
    assert_eq!(
        errors_of("{uniqueItems: true}", "[1, 2, 1]")[0].kind,
        MessageKind::SchemaUniqueItemsViolation
    );
    // Object key order is irrelevant to uniqueness.
    assert_eq!(
        errors_of("{uniqueItems: true}", "[{a: 1, b: 2}, {b: 2, a: 1}]")[0].kind,
        MessageKind::SchemaUniqueItemsViolation
    );
    // Numbers compare by normalized form: 1 and 1.0 differ.
    assert!(errors_of("{uniqueItems: true}", "[1, 1.0]").is_empty());
    assert!(errors_of("{items: {type: number}}", "[1, 2.5]").is_empty());
    assert_eq!(
        errors_of("{items: {type: number}}", "[1, 'x']")[0].kind,
        MessageKind::SchemaTypeMismatch
    );
    // Positional items with closed tail.
    let schema = "{items: [{type: string}], additionalItems: false}";
    assert_eq!(
        errors_of(schema, "['a', 'b']")[0].kind,
        MessageKind::SchemaAdditionalItemsForbidden
    );
    assert_eq!(
        errors_of("{contains: {type: string}}", "[1, 2]")[0].kind,
        MessageKind::SchemaContainsViolation
    );
}

#[test]
fn object_constraints() {
    let schema = "{properties: {a: {type: number}}, additionalProperties: false}";
    let errors = errors_of(schema, "{a: 1, b: 2}");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, MessageKind::SchemaAdditionalPropertyForbidden);
    assert_eq!(errors[0].params, vec!["b".to_string()]);

    let schema = "{patternProperties: {'^x_': {type: number}}, additionalProperties: false}";
    assert!(errors_of(schema, "{x_one: 1, x_two: 2}").is_empty());
    assert_eq!(errors_of(schema, "{x_one: 'no'}").len(), 1);

    assert_eq!(
        errors_of("{minProperties: 2}", "{a: 1}")[0].kind,
        MessageKind::SchemaMinPropertiesViolation
    );
    assert_eq!(
        errors_of("{propertyNames: {maxLength: 2}}", "{abc: 1}")[0].kind,
        MessageKind::SchemaPropertyNamesViolation
    );
    let deps = "{dependencies: {credit: [billing]}}";
    assert_eq!(
        errors_of(deps, "{credit: 1}")[0].kind,
        MessageKind::SchemaDependencyMissing
    );
    assert!(errors_of(deps, "{credit: 1, billing: 2}").is_empty());
}

#[test]
fn if_then_else() {
    let schema = "{'if': {properties: {kind: {const: a}}}, 'then': {required: [alpha]}, 'else': {required: [beta]}}";
    assert_eq!(
        errors_of(schema, "{kind: a}")[0].kind,
        MessageKind::SchemaRequiredPropertyMissing
    );
    assert!(errors_of(schema, "{kind: a, alpha: 1}").is_empty());
    assert!(errors_of(schema, "{kind: b, beta: 1}").is_empty());
}

// ============================================================================
// Combinators
// ============================================================================

#[test]
fn all_of_merges_branch_errors() {
    let schema = "{allOf: [{minimum: 10}, {multipleOf: 2}]}";
    let errors = errors_of(schema, "3");
    assert_eq!(errors.len(), 2, "{errors:?}");
}

#[test]
fn any_of_passes_on_any_branch() {
    let schema = "{anyOf: [{type: string}, {type: boolean}]}";
    assert!(errors_of(schema, "true").is_empty());
    let errors = errors_of(schema, "42");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, MessageKind::SchemaAnyOfNoMatch);
}

#[test]
fn any_of_surfaces_universal_errors() {
    // Both branches agree the value must be a string; that shared error is
    // reported directly instead of a grouped summary.
    let schema = "{anyOf: [{type: string, minLength: 3}, {type: string, maxLength: 1}]}";
    let errors = errors_of(schema, "42");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, MessageKind::SchemaTypeMismatch);
}

#[test]
fn one_of_demands_exactly_one() {
    let schema = "{oneOf: [{type: number}, {type: integer}]}";
    let errors = errors_of(schema, "3");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, MessageKind::SchemaOneOfMultipleMatches);
    assert!(errors_of(schema, "1.5").is_empty());
}

#[test]
fn not_inverts() {
    assert_eq!(
        errors_of("{'not': {type: string}}", "'text'")[0].kind,
        MessageKind::SchemaNotMatched
    );
    assert!(errors_of("{'not': {type: string}}", "42").is_empty());
}

// ============================================================================
// $ref / $id resolution
// ============================================================================

#[test]
fn pointer_refs_validate_through_definitions() {
    let schema = "{definitions: {positive: {type: number, minimum: 0}}, '$ref': '#/definitions/positive'}";
    assert!(errors_of(schema, "5").is_empty());
    assert_eq!(
        errors_of(schema, "-5")[0].kind,
        MessageKind::SchemaMinimumViolation
    );
}

#[test]
fn recursive_schemas_terminate() {
    let schema = "{type: object, properties: {child: {'$ref': '#'}}}";
    assert!(errors_of(schema, "{child: {child: {child: {}}}}").is_empty());
    assert_eq!(
        errors_of(schema, "{child: {child: 3}}")[0].kind,
        MessageKind::SchemaTypeMismatch
    );
}

#[test]
fn refs_resolve_against_nested_ids() {
    let schema = "{'$id': 'http://example.com/root.json', definitions: {leaf: {'$id': 'leaf.json', type: boolean}}, properties: {flag: {'$ref': 'leaf.json'}}}";
    assert!(errors_of(schema, "{flag: true}").is_empty());
    assert_eq!(errors_of(schema, "{flag: 3}").len(), 1);
}

#[test]
fn unresolved_refs_warn_but_do_not_fail() {
    let parsed = parse_schema("{'$ref': '#/definitions/missing'}");
    let validator = parsed.validator.expect("usable schema");
    let messages = validator.validate("42");
    assert!(messages
        .iter()
        .any(|m| m.kind == MessageKind::SchemaRefUnresolved && m.severity == Severity::Warning));
    assert!(!messages.iter().any(|m| m.severity == Severity::Error));
}

#[test]
fn meta_schema_ref_is_preregistered() {
    let schema = "{'$ref': 'http://json-schema.org/draft-07/schema#'}";
    let parsed = parse_schema(schema);
    let validator = parsed.validator.expect("usable schema");
    // A valid schema document validates against the meta-schema...
    assert!(validator
        .validate("{type: object, properties: {a: {type: string}}}")
        .iter()
        .all(|m| m.severity != Severity::Error));
    // ...and a bogus `type` does not.
    assert!(validator
        .validate("{type: 42}")
        .iter()
        .any(|m| m.severity == Severity::Error));
}

// ============================================================================
// Schema meta-validation in parse_schema
// ============================================================================

#[test]
fn parse_schema_flags_bad_schemas() {
    let parsed = parse_schema("{type: 42}");
    assert!(parsed.validator.is_some(), "tree still usable");
    assert!(
        parsed.messages.iter().any(|m| m.severity == Severity::Error),
        "{:?}",
        parsed.messages
    );
}

#[test]
fn boolean_schemas_work() {
    let always = parse_schema("true").validator.expect("boolean schema");
    assert!(always.validate("{anything: [1, 2]}").is_empty());
    let never = parse_schema("false").validator.expect("boolean schema");
    assert_eq!(never.validate("1")[0].kind, MessageKind::SchemaNeverValid);
}

#[test]
fn validation_needs_a_parsed_document() {
    let v = validator("{type: object}");
    let messages = v.validate("{broken: 'doc");
    assert!(messages.iter().any(|m| m.kind == MessageKind::StringNoClose));
}
