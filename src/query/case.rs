//! Case-insensitivity policy and LIKE escaping.

use tracing::debug;

use crate::query::ast::{IgnoreCase, OperatorType, PredicatePart};
use crate::query::metadata::LeafProperty;
use crate::query::value::Argument;

/// Operators for which case has no meaning.
const UNSUPPORTED_IGNORE_CASE: [OperatorType; 7] = [
    OperatorType::Exists,
    OperatorType::True,
    OperatorType::False,
    OperatorType::IsNull,
    OperatorType::IsNotNull,
    OperatorType::Near,
    OperatorType::Within,
];

/// Whether `operator` can be evaluated case-insensitively at all.
pub fn supports_ignore_case(operator: OperatorType) -> bool {
    !UNSUPPORTED_IGNORE_CASE.contains(&operator)
}

/// Decides whether `part` is compiled case-insensitively.
///
/// Requires a request on the part, a string-typed leaf and an operator with a
/// notion of case. An explicit request that cannot be honoured is reported
/// and otherwise ignored.
pub fn should_ignore_case(part: &PredicatePart, leaf: &LeafProperty) -> bool {
    let lowerable = leaf.kind.is_lowerable();
    let supported = supports_ignore_case(part.operator);
    if part.ignore_case == IgnoreCase::Always && !(lowerable && supported) {
        debug!(
            property = %part.property,
            operator = %part.operator,
            kind = ?leaf.kind,
            "derived.ignore_case.meaningless"
        );
    }
    part.ignore_case != IgnoreCase::Never && lowerable && supported
}

/// Renders the document access for `field_path`, wrapped in `LOWER` when
/// case is ignored. Collection leaves are lowered element-wise.
pub fn property_reference(field_path: &str, leaf: &LeafProperty, ignore_case: bool) -> String {
    let property = format!("e.{field_path}");
    match (ignore_case, leaf.collection) {
        (false, _) => property,
        (true, false) => format!("LOWER({property})"),
        (true, true) => format!("(FOR i IN TO_ARRAY({property}) RETURN LOWER(i))"),
    }
}

/// Lower-cases the string payload of `argument` when case is ignored.
pub fn lower_argument(argument: Argument, ignore_case: bool) -> Argument {
    if ignore_case {
        argument.to_lowercase()
    } else {
        argument
    }
}

/// Escapes LIKE wildcards (`%`, `_`) and the escape character itself.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
