use crate::{
    error::{Operation, ShapeError},
    matcher::{satisfies, scalar},
    shape::TypeShape,
    value::Value,
};
use tracing::trace;

///
/// cast_value
///
/// Best-effort conversion of a value into a shape.
/// Every path yields a concrete value or an error.
///
pub fn cast_value(value: &Value, shape: &TypeShape) -> Result<Value, ShapeError> {
    match shape {
        TypeShape::Any => Ok(value.clone()),
        TypeShape::None => {
            if value.is_none() {
                Ok(Value::None)
            } else {
                Err(ShapeError::coercion(value, shape, "only None is accepted"))
            }
        }
        TypeShape::SelfRef(_) => Err(ShapeError::coercion(
            value,
            shape,
            "casting to a self reference is not supported",
        )),
        TypeShape::Instance(name) => {
            if satisfies(value, shape) {
                Ok(value.clone())
            } else {
                Err(ShapeError::coercion(
                    value,
                    shape,
                    format!("not an instance of {name}"),
                ))
            }
        }
        TypeShape::Union(members) => cast_union(value, shape, members),
        TypeShape::Scalar(kind) => {
            if kind.matches(value) {
                Ok(value.clone())
            } else {
                scalar::convert(value, *kind)
                    .map_err(|reason| ShapeError::coercion(value, shape, reason))
            }
        }
        TypeShape::Sequence { kind, element } => {
            let items = cast_elements(iterable(value, shape)?, element)?;
            Ok(Value::seq(*kind, items))
        }
        TypeShape::Mapping {
            kind,
            key,
            value: value_shape,
        } => {
            let Value::Map(_, entries) = value else {
                return Err(ShapeError::coercion(value, shape, "value is not a mapping"));
            };

            let entries = entries
                .iter()
                .map(|(k, v)| Ok((cast_value(k, key)?, cast_value(v, value_shape)?)))
                .collect::<Result<Vec<_>, ShapeError>>()?;

            Ok(Value::map(*kind, entries))
        }
        TypeShape::Tuple(positions) => {
            let items = iterable(value, shape)?;
            if items.len() != positions.len() {
                return Err(ShapeError::Arity {
                    expected: positions.len(),
                    actual: items.len(),
                });
            }

            let items = items
                .into_iter()
                .zip(positions)
                .map(|(item, position)| cast_value(item, position))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Value::Tuple(items))
        }
        TypeShape::VariadicTuple(element) => {
            let items = cast_elements(iterable(value, shape)?, element)?;
            Ok(Value::Tuple(items))
        }
        TypeShape::Container { kind, element } => {
            if !kind.is_iterable() {
                return Err(ShapeError::NoHandler {
                    operation: Operation::Casting,
                    kind: kind.name().to_string(),
                });
            }

            let items = cast_elements(iterable(value, shape)?, element)?;
            Ok(Value::Container(kind.clone(), items))
        }
    }
}

// Union resolution order:
// 1. absent value with an absence member stays absent
// 2. a value that already belongs to any member is kept unchanged
// 3. a container whose outer kind matches a member is cast element-wise
//    into the first such member, or kept as-is if that fails
// 4. first member that accepts a full cast wins
fn cast_union(value: &Value, shape: &TypeShape, members: &[TypeShape]) -> Result<Value, ShapeError> {
    if value.is_none() && members.iter().any(TypeShape::is_absence) {
        return Ok(Value::None);
    }

    let present = || members.iter().filter(|member| !member.is_absence());

    if present().any(|member| satisfies(value, member)) {
        return Ok(value.clone());
    }

    if let Some(member) = present().find(|member| {
        member.is_container_shape() && member.outer_kind_matches(value)
    }) {
        return Ok(cast_value(value, member).unwrap_or_else(|_| value.clone()));
    }

    let mut attempts = Vec::with_capacity(members.len());
    for member in members {
        if member.is_absence() && !value.is_none() {
            continue;
        }

        match cast_value(value, member) {
            Ok(cast) => {
                trace!(target: "recordkit::cast", member = %member, "union member accepted value");
                return Ok(cast);
            }
            Err(err) => attempts.push(err),
        }
    }

    Err(ShapeError::NoMemberAccepted {
        value: value.repr(),
        kind: value.kind_name(),
        target: shape.to_string(),
        attempts,
    })
}

fn iterable<'a>(value: &'a Value, shape: &TypeShape) -> Result<Vec<&'a Value>, ShapeError> {
    value
        .elements()
        .ok_or_else(|| ShapeError::coercion(value, shape, "value is not iterable"))
}

fn cast_elements(items: Vec<&Value>, element: &TypeShape) -> Result<Vec<Value>, ShapeError> {
    items
        .into_iter()
        .map(|item| cast_value(item, element))
        .collect()
}
