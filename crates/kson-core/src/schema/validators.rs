//! Draft-07 keyword validators.
//!
//! Dispatch is by the schema node's applicable keywords: each schema object
//! instantiates the matching [`Keyword`] variants and runs all of them
//! against the instance. Failures accumulate; only combinator branch
//! attempts run against scratch sinks. `$ref` replaces the node entirely,
//! with an active-chain set so recursive schemas terminate.

use crate::message::{Message, MessageKind, MessageSink, Severity};
use crate::schema::id_lookup::SchemaIdLookup;
use crate::schema::uri;
use crate::value::{Kson, ObjectValue, ValueKind};

/// Recursion cap shared with the parser and formatter.
pub const MAX_DEPTH: usize = 256;

pub(crate) struct Ctx<'a, 'k> {
    pub lookup: &'a SchemaIdLookup<'k>,
    /// (canonical ref URI, instance start offset) pairs currently being
    /// resolved; re-entry is a no-op pass.
    pub active_refs: Vec<(String, usize)>,
}

pub(crate) fn validate_node(
    schema: &Kson,
    base: &str,
    instance: &Kson,
    depth: usize,
    ctx: &mut Ctx<'_, '_>,
    sink: &mut MessageSink,
) {
    if depth > MAX_DEPTH {
        sink.error(MessageKind::DepthExceeded, instance.location);
        return;
    }

    let obj = match &schema.kind {
        ValueKind::Bool(true) => return,
        ValueKind::Bool(false) => {
            sink.error(MessageKind::SchemaNeverValid, instance.location);
            return;
        }
        ValueKind::Object(o) => o,
        // Anything else is not a schema; meta-validation reports it.
        _ => return,
    };

    if let Some(reference) = obj.get("$ref").and_then(Kson::as_str) {
        let key = (
            ctx.lookup.canonical_uri(reference, base),
            instance.location.start.byte_offset,
        );
        if ctx.active_refs.contains(&key) {
            return;
        }
        match ctx.lookup.resolve(reference, base) {
            Some(target) => {
                ctx.active_refs.push(key);
                let target_base = target.base_uri.clone();
                validate_node(target.node, &target_base, instance, depth + 1, ctx, sink);
                ctx.active_refs.pop();
            }
            None => sink.warning_with(
                MessageKind::SchemaRefUnresolved,
                instance.location,
                vec![reference.to_string()],
            ),
        }
        return;
    }

    let base_owned;
    let base = match obj.get("$id").and_then(Kson::as_str) {
        Some(id) if !id.starts_with('#') => {
            base_owned = uri::resolve_reference(base, id);
            uri::normalize(&base_owned)
        }
        _ => base,
    };

    for keyword in applicable(obj) {
        run(keyword, base, instance, depth, ctx, sink);
    }
}

/// The validators a schema object instantiates.
enum Keyword<'s> {
    Type(&'s Kson),
    Enum(&'s Kson),
    Const(&'s Kson),
    Minimum(&'s Kson),
    Maximum(&'s Kson),
    ExclusiveMinimum(&'s Kson),
    ExclusiveMaximum(&'s Kson),
    MultipleOf(&'s Kson),
    MinLength(&'s Kson),
    MaxLength(&'s Kson),
    Pattern(&'s Kson),
    Format(&'s Kson),
    MinItems(&'s Kson),
    MaxItems(&'s Kson),
    UniqueItems(&'s Kson),
    Items {
        items: Option<&'s Kson>,
        additional: Option<&'s Kson>,
    },
    Contains(&'s Kson),
    Required(&'s Kson),
    Properties {
        properties: Option<&'s Kson>,
        pattern: Option<&'s Kson>,
        additional: Option<&'s Kson>,
    },
    PropertyNames(&'s Kson),
    MinProperties(&'s Kson),
    MaxProperties(&'s Kson),
    Dependencies(&'s Kson),
    IfThenElse {
        condition: &'s Kson,
        then: Option<&'s Kson>,
        otherwise: Option<&'s Kson>,
    },
    AllOf(&'s Kson),
    AnyOf(&'s Kson),
    OneOf(&'s Kson),
    Not(&'s Kson),
}

fn applicable<'s>(obj: &'s ObjectValue) -> Vec<Keyword<'s>> {
    let mut out = Vec::new();
    if let Some(n) = obj.get("type") {
        out.push(Keyword::Type(n));
    }
    if let Some(n) = obj.get("enum") {
        out.push(Keyword::Enum(n));
    }
    if let Some(n) = obj.get("const") {
        out.push(Keyword::Const(n));
    }
    if let Some(n) = obj.get("minimum") {
        out.push(Keyword::Minimum(n));
    }
    if let Some(n) = obj.get("maximum") {
        out.push(Keyword::Maximum(n));
    }
    if let Some(n) = obj.get("exclusiveMinimum") {
        out.push(Keyword::ExclusiveMinimum(n));
    }
    if let Some(n) = obj.get("exclusiveMaximum") {
        out.push(Keyword::ExclusiveMaximum(n));
    }
    if let Some(n) = obj.get("multipleOf") {
        out.push(Keyword::MultipleOf(n));
    }
    if let Some(n) = obj.get("minLength") {
        out.push(Keyword::MinLength(n));
    }
    if let Some(n) = obj.get("maxLength") {
        out.push(Keyword::MaxLength(n));
    }
    if let Some(n) = obj.get("pattern") {
        out.push(Keyword::Pattern(n));
    }
    if let Some(n) = obj.get("format") {
        out.push(Keyword::Format(n));
    }
    if let Some(n) = obj.get("minItems") {
        out.push(Keyword::MinItems(n));
    }
    if let Some(n) = obj.get("maxItems") {
        out.push(Keyword::MaxItems(n));
    }
    if let Some(n) = obj.get("uniqueItems") {
        out.push(Keyword::UniqueItems(n));
    }
    if obj.get("items").is_some() || obj.get("additionalItems").is_some() {
        out.push(Keyword::Items {
            items: obj.get("items"),
            additional: obj.get("additionalItems"),
        });
    }
    if let Some(n) = obj.get("contains") {
        out.push(Keyword::Contains(n));
    }
    if let Some(n) = obj.get("required") {
        out.push(Keyword::Required(n));
    }
    if obj.get("properties").is_some()
        || obj.get("patternProperties").is_some()
        || obj.get("additionalProperties").is_some()
    {
        out.push(Keyword::Properties {
            properties: obj.get("properties"),
            pattern: obj.get("patternProperties"),
            additional: obj.get("additionalProperties"),
        });
    }
    if let Some(n) = obj.get("propertyNames") {
        out.push(Keyword::PropertyNames(n));
    }
    if let Some(n) = obj.get("minProperties") {
        out.push(Keyword::MinProperties(n));
    }
    if let Some(n) = obj.get("maxProperties") {
        out.push(Keyword::MaxProperties(n));
    }
    if let Some(n) = obj.get("dependencies") {
        out.push(Keyword::Dependencies(n));
    }
    if let Some(condition) = obj.get("if") {
        out.push(Keyword::IfThenElse {
            condition,
            then: obj.get("then"),
            otherwise: obj.get("else"),
        });
    }
    if let Some(n) = obj.get("allOf") {
        out.push(Keyword::AllOf(n));
    }
    if let Some(n) = obj.get("anyOf") {
        out.push(Keyword::AnyOf(n));
    }
    if let Some(n) = obj.get("oneOf") {
        out.push(Keyword::OneOf(n));
    }
    if let Some(n) = obj.get("not") {
        out.push(Keyword::Not(n));
    }
    out
}

/// Validate into a scratch sink; "passes" means no error-severity message.
fn branch_messages(
    schema: &Kson,
    base: &str,
    instance: &Kson,
    depth: usize,
    ctx: &mut Ctx<'_, '_>,
) -> Vec<Message> {
    let mut scratch = MessageSink::new();
    validate_node(schema, base, instance, depth, ctx, &mut scratch);
    scratch.into_messages()
}

fn passes(messages: &[Message]) -> bool {
    !messages.iter().any(|m| m.severity == Severity::Error)
}

fn run(
    keyword: Keyword<'_>,
    base: &str,
    instance: &Kson,
    depth: usize,
    ctx: &mut Ctx<'_, '_>,
    sink: &mut MessageSink,
) {
    match keyword {
        Keyword::Type(expected) => check_type(expected, instance, sink),
        Keyword::Enum(allowed) => {
            if let Some(values) = allowed.as_array() {
                if !values.iter().any(|v| v.structural_eq(instance)) {
                    sink.error(MessageKind::SchemaEnumMismatch, instance.location);
                }
            }
        }
        Keyword::Const(expected) => {
            if !expected.structural_eq(instance) {
                sink.error(MessageKind::SchemaConstMismatch, instance.location);
            }
        }
        Keyword::Minimum(bound) => {
            if let (Some(v), Some(b)) = (instance.as_f64(), bound.as_f64()) {
                if v < b {
                    sink.error_with(
                        MessageKind::SchemaMinimumViolation,
                        instance.location,
                        vec![render(bound)],
                    );
                }
            }
        }
        Keyword::Maximum(bound) => {
            if let (Some(v), Some(b)) = (instance.as_f64(), bound.as_f64()) {
                if v > b {
                    sink.error_with(
                        MessageKind::SchemaMaximumViolation,
                        instance.location,
                        vec![render(bound)],
                    );
                }
            }
        }
        Keyword::ExclusiveMinimum(bound) => {
            if let (Some(v), Some(b)) = (instance.as_f64(), bound.as_f64()) {
                if v <= b {
                    sink.error_with(
                        MessageKind::SchemaExclusiveMinimumViolation,
                        instance.location,
                        vec![render(bound)],
                    );
                }
            }
        }
        Keyword::ExclusiveMaximum(bound) => {
            if let (Some(v), Some(b)) = (instance.as_f64(), bound.as_f64()) {
                if v >= b {
                    sink.error_with(
                        MessageKind::SchemaExclusiveMaximumViolation,
                        instance.location,
                        vec![render(bound)],
                    );
                }
            }
        }
        Keyword::MultipleOf(bound) => {
            if let (Some(v), Some(b)) = (instance.as_f64(), bound.as_f64()) {
                if b > 0.0 {
                    let quotient = v / b;
                    if (quotient - quotient.round()).abs() > 1e-9 {
                        sink.error_with(
                            MessageKind::SchemaMultipleOfViolation,
                            instance.location,
                            vec![render(bound)],
                        );
                    }
                }
            }
        }
        Keyword::MinLength(bound) => {
            if let (Some(s), Some(b)) = (string_of(instance), bound.as_f64()) {
                if (s.chars().count() as f64) < b {
                    sink.error_with(
                        MessageKind::SchemaMinLengthViolation,
                        instance.location,
                        vec![render(bound)],
                    );
                }
            }
        }
        Keyword::MaxLength(bound) => {
            if let (Some(s), Some(b)) = (string_of(instance), bound.as_f64()) {
                if (s.chars().count() as f64) > b {
                    sink.error_with(
                        MessageKind::SchemaMaxLengthViolation,
                        instance.location,
                        vec![render(bound)],
                    );
                }
            }
        }
        Keyword::Pattern(pattern) => {
            if let (Some(s), Some(p)) = (string_of(instance), pattern.as_str()) {
                // An uncompilable pattern is skipped, never fatal.
                if let Ok(re) = regex::Regex::new(p) {
                    if !re.is_match(s) {
                        sink.error_with(
                            MessageKind::SchemaPatternMismatch,
                            instance.location,
                            vec![p.to_string()],
                        );
                    }
                }
            }
        }
        Keyword::Format(format) => {
            if let (Some(s), Some(f)) = (string_of(instance), format.as_str()) {
                if !format_matches(f, s) {
                    sink.warning_with(
                        MessageKind::SchemaFormatMismatch,
                        instance.location,
                        vec![f.to_string()],
                    );
                }
            }
        }
        Keyword::MinItems(bound) => {
            if let (Some(a), Some(b)) = (instance.as_array(), bound.as_f64()) {
                if (a.len() as f64) < b {
                    sink.error_with(
                        MessageKind::SchemaMinItemsViolation,
                        instance.location,
                        vec![render(bound)],
                    );
                }
            }
        }
        Keyword::MaxItems(bound) => {
            if let (Some(a), Some(b)) = (instance.as_array(), bound.as_f64()) {
                if (a.len() as f64) > b {
                    sink.error_with(
                        MessageKind::SchemaMaxItemsViolation,
                        instance.location,
                        vec![render(bound)],
                    );
                }
            }
        }
        Keyword::UniqueItems(flag) => {
            if flag.as_bool() == Some(true) {
                if let Some(elements) = instance.as_array() {
                    'outer: for i in 0..elements.len() {
                        for j in 0..i {
                            if elements[i].structural_eq(&elements[j]) {
                                sink.error(
                                    MessageKind::SchemaUniqueItemsViolation,
                                    elements[i].location,
                                );
                                break 'outer;
                            }
                        }
                    }
                }
            }
        }
        Keyword::Items { items, additional } => {
            check_items(items, additional, base, instance, depth, ctx, sink)
        }
        Keyword::Contains(sub) => {
            if let Some(elements) = instance.as_array() {
                let any = elements
                    .iter()
                    .any(|e| passes(&branch_messages(sub, base, e, depth + 1, ctx)));
                if !any {
                    sink.error(MessageKind::SchemaContainsViolation, instance.location);
                }
            }
        }
        Keyword::Required(names) => {
            if let (Some(o), Some(required)) = (instance.as_object(), names.as_array()) {
                for name in required.iter().filter_map(Kson::as_str) {
                    if !o.contains_key(name) {
                        sink.error_with(
                            MessageKind::SchemaRequiredPropertyMissing,
                            instance.location,
                            vec![name.to_string()],
                        );
                    }
                }
            }
        }
        Keyword::Properties {
            properties,
            pattern,
            additional,
        } => check_properties(properties, pattern, additional, base, instance, depth, ctx, sink),
        Keyword::PropertyNames(sub) => {
            if let Some(o) = instance.as_object() {
                for p in &o.properties {
                    let key_node = Kson::new(
                        ValueKind::String(crate::value::StringValue {
                            value: p.key.text.clone(),
                            raw: p.key.raw.clone(),
                            quote: p.key.quote,
                        }),
                        p.key.location,
                    );
                    if !passes(&branch_messages(sub, base, &key_node, depth + 1, ctx)) {
                        sink.error_with(
                            MessageKind::SchemaPropertyNamesViolation,
                            p.key.location,
                            vec![p.key.text.clone()],
                        );
                    }
                }
            }
        }
        Keyword::MinProperties(bound) => {
            if let (Some(o), Some(b)) = (instance.as_object(), bound.as_f64()) {
                if (o.distinct_len() as f64) < b {
                    sink.error_with(
                        MessageKind::SchemaMinPropertiesViolation,
                        instance.location,
                        vec![render(bound)],
                    );
                }
            }
        }
        Keyword::MaxProperties(bound) => {
            if let (Some(o), Some(b)) = (instance.as_object(), bound.as_f64()) {
                if (o.distinct_len() as f64) > b {
                    sink.error_with(
                        MessageKind::SchemaMaxPropertiesViolation,
                        instance.location,
                        vec![render(bound)],
                    );
                }
            }
        }
        Keyword::Dependencies(deps) => {
            if let (Some(o), Some(spec)) = (instance.as_object(), deps.as_object()) {
                for dep in &spec.properties {
                    if !o.contains_key(&dep.key.text) {
                        continue;
                    }
                    match &dep.value.kind {
                        ValueKind::Array { elements, .. } => {
                            for needed in elements.iter().filter_map(Kson::as_str) {
                                if !o.contains_key(needed) {
                                    sink.error_with(
                                        MessageKind::SchemaDependencyMissing,
                                        instance.location,
                                        vec![dep.key.text.clone(), needed.to_string()],
                                    );
                                }
                            }
                        }
                        _ => validate_node(&dep.value, base, instance, depth + 1, ctx, sink),
                    }
                }
            }
        }
        Keyword::IfThenElse {
            condition,
            then,
            otherwise,
        } => {
            let holds = passes(&branch_messages(condition, base, instance, depth + 1, ctx));
            let chosen = if holds { then } else { otherwise };
            if let Some(schema) = chosen {
                validate_node(schema, base, instance, depth + 1, ctx, sink);
            }
        }
        Keyword::AllOf(branches) => {
            if let Some(list) = branches.as_array() {
                // Every branch must pass; all errors are reported.
                for branch in list {
                    validate_node(branch, base, instance, depth + 1, ctx, sink);
                }
            }
        }
        Keyword::AnyOf(branches) => {
            if let Some(list) = branches.as_array() {
                let results: Vec<Vec<Message>> = list
                    .iter()
                    .map(|b| branch_messages(b, base, instance, depth + 1, ctx))
                    .collect();
                if !results.iter().any(|r| passes(r)) {
                    report_no_match(&results, instance, sink);
                }
            }
        }
        Keyword::OneOf(branches) => {
            if let Some(list) = branches.as_array() {
                let results: Vec<Vec<Message>> = list
                    .iter()
                    .map(|b| branch_messages(b, base, instance, depth + 1, ctx))
                    .collect();
                let matching = results.iter().filter(|r| passes(r)).count();
                match matching {
                    1 => {}
                    0 => report_no_match(&results, instance, sink),
                    n => sink.error_with(
                        MessageKind::SchemaOneOfMultipleMatches,
                        instance.location,
                        vec![n.to_string()],
                    ),
                }
            }
        }
        Keyword::Not(sub) => {
            if passes(&branch_messages(sub, base, instance, depth + 1, ctx)) {
                sink.error(MessageKind::SchemaNotMatched, instance.location);
            }
        }
    }
}

/// No branch matched: surface the errors every branch agrees on, or one
/// grouped summary when the branches disagree.
fn report_no_match(results: &[Vec<Message>], instance: &Kson, sink: &mut MessageSink) {
    let universal: Vec<Message> = match results.first() {
        Some(first) => first
            .iter()
            .filter(|m| m.severity == Severity::Error)
            .filter(|m| results[1..].iter().all(|r| r.contains(m)))
            .cloned()
            .collect(),
        None => Vec::new(),
    };
    if universal.is_empty() {
        sink.error_with(
            MessageKind::SchemaAnyOfNoMatch,
            instance.location,
            vec![results.len().to_string()],
        );
    } else {
        for m in universal {
            sink.push(m);
        }
    }
}

fn check_type(expected: &Kson, instance: &Kson, sink: &mut MessageSink) {
    let names: Vec<&str> = match &expected.kind {
        ValueKind::String(s) => vec![s.value.as_str()],
        ValueKind::Array { elements, .. } => elements.iter().filter_map(Kson::as_str).collect(),
        _ => return,
    };
    if names.is_empty() {
        return;
    }
    if !names.iter().any(|n| type_matches(n, instance)) {
        sink.error_with(
            MessageKind::SchemaTypeMismatch,
            instance.location,
            vec![names.join(" or "), instance.type_name().to_string()],
        );
    }
}

fn type_matches(name: &str, instance: &Kson) -> bool {
    match name {
        "integer" => instance.is_schema_integer(),
        "number" => instance.as_f64().is_some(),
        "string" => string_of(instance).is_some(),
        "null" => matches!(instance.kind, ValueKind::Null),
        "boolean" => matches!(instance.kind, ValueKind::Bool(_)),
        "array" => instance.as_array().is_some(),
        "object" => instance.as_object().is_some(),
        _ => false,
    }
}

fn string_of(instance: &Kson) -> Option<&str> {
    match &instance.kind {
        ValueKind::String(_) | ValueKind::Embed(_) => instance.as_str(),
        _ => None,
    }
}

#[allow(clippy::too_many_arguments)]
fn check_items(
    items: Option<&Kson>,
    additional: Option<&Kson>,
    base: &str,
    instance: &Kson,
    depth: usize,
    ctx: &mut Ctx<'_, '_>,
    sink: &mut MessageSink,
) {
    let elements = match instance.as_array() {
        Some(e) => e,
        None => return,
    };
    match items.map(|i| &i.kind) {
        Some(ValueKind::Array { elements: schemas, .. }) => {
            for (i, e) in elements.iter().enumerate() {
                match schemas.get(i) {
                    Some(s) => validate_node(s, base, e, depth + 1, ctx, sink),
                    None => match additional.map(|a| &a.kind) {
                        Some(ValueKind::Bool(false)) => {
                            sink.error(MessageKind::SchemaAdditionalItemsForbidden, e.location);
                        }
                        Some(_) => {
                            if let Some(a) = additional {
                                validate_node(a, base, e, depth + 1, ctx, sink);
                            }
                        }
                        None => {}
                    },
                }
            }
        }
        Some(_) => {
            if let Some(single) = items {
                for e in elements {
                    validate_node(single, base, e, depth + 1, ctx, sink);
                }
            }
        }
        // additionalItems without items constrains nothing.
        None => {}
    }
}

#[allow(clippy::too_many_arguments)]
fn check_properties(
    properties: Option<&Kson>,
    pattern: Option<&Kson>,
    additional: Option<&Kson>,
    base: &str,
    instance: &Kson,
    depth: usize,
    ctx: &mut Ctx<'_, '_>,
    sink: &mut MessageSink,
) {
    let o = match instance.as_object() {
        Some(o) => o,
        None => return,
    };
    let props = properties.and_then(Kson::as_object);
    let patterns = pattern.and_then(Kson::as_object);

    for p in &o.properties {
        let mut matched = false;
        if let Some(sub) = props.and_then(|m| m.get(&p.key.text)) {
            validate_node(sub, base, &p.value, depth + 1, ctx, sink);
            matched = true;
        }
        if let Some(patterns) = patterns {
            for pat in &patterns.properties {
                if let Ok(re) = regex::Regex::new(&pat.key.text) {
                    if re.is_match(&p.key.text) {
                        validate_node(&pat.value, base, &p.value, depth + 1, ctx, sink);
                        matched = true;
                    }
                }
            }
        }
        if !matched {
            match additional.map(|a| &a.kind) {
                Some(ValueKind::Bool(false)) => {
                    sink.error_with(
                        MessageKind::SchemaAdditionalPropertyForbidden,
                        p.key.location,
                        vec![p.key.text.clone()],
                    );
                }
                Some(_) => {
                    if let Some(a) = additional {
                        validate_node(a, base, &p.value, depth + 1, ctx, sink);
                    }
                }
                None => {}
            }
        }
    }
}

/// Render a schema constant for message params.
fn render(v: &Kson) -> String {
    crate::transcode::value_to_json(v)
}

/// Advisory format checks: light syntactic screens for the common Draft-07
/// formats; unknown names always pass.
fn format_matches(format: &str, s: &str) -> bool {
    match format {
        "date" => is_date(s),
        "time" => is_time(s),
        "date-time" => match s.split_once(['T', 't']) {
            Some((d, t)) => is_date(d) && is_time(t),
            None => false,
        },
        "email" => {
            let parts: Vec<&str> = s.splitn(2, '@').collect();
            parts.len() == 2 && !parts[0].is_empty() && parts[1].contains('.')
        }
        "uri" => s.contains(':') && !s.contains(' '),
        "uri-reference" => !s.contains(' '),
        "uuid" => {
            let groups: Vec<&str> = s.split('-').collect();
            groups.len() == 5
                && [8, 4, 4, 4, 12]
                    .iter()
                    .zip(&groups)
                    .all(|(n, g)| g.len() == *n && g.chars().all(|c| c.is_ascii_hexdigit()))
        }
        "ipv4" => {
            let octets: Vec<&str> = s.split('.').collect();
            octets.len() == 4 && octets.iter().all(|o| o.parse::<u8>().is_ok())
        }
        "ipv6" => s.matches(':').count() >= 2 && s.chars().all(|c| c.is_ascii_hexdigit() || c == ':' || c == '.'),
        "hostname" => {
            !s.is_empty()
                && s.split('.').all(|l| {
                    !l.is_empty()
                        && l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                        && !l.starts_with('-')
                        && !l.ends_with('-')
                })
        }
        "regex" => regex::Regex::new(s).is_ok(),
        _ => true,
    }
}

fn is_date(s: &str) -> bool {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 3 || parts[0].len() != 4 || parts[1].len() != 2 || parts[2].len() != 2 {
        return false;
    }
    let nums: Vec<Option<u32>> = parts.iter().map(|p| p.parse().ok()).collect();
    match (nums[0], nums[1], nums[2]) {
        (Some(_), Some(m), Some(d)) => (1..=12).contains(&m) && (1..=31).contains(&d),
        _ => false,
    }
}

fn is_time(s: &str) -> bool {
    let s = s
        .trim_end_matches(['Z', 'z'])
        .split(['+', '-'])
        .next()
        .unwrap_or(s);
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() < 3 {
        return false;
    }
    let h: Option<u32> = parts[0].parse().ok();
    let m: Option<u32> = parts[1].parse().ok();
    let sec: Option<f64> = parts[2].parse().ok();
    matches!((h, m, sec), (Some(h), Some(m), Some(sec)) if h < 24 && m < 60 && sec < 61.0)
}
