use crate::{
    error::{Operation, ShapeError},
    shape::TypeShape,
    value::Value,
};

///
/// validate_value
///
/// Check a value against a shape without changing it.
/// Element failures are reported as the innermost failing check.
///
pub fn validate_value(value: &Value, shape: &TypeShape) -> Result<(), ShapeError> {
    match shape {
        TypeShape::Any => Ok(()),
        TypeShape::None => expect(value.is_none(), value, shape),
        TypeShape::Scalar(kind) => expect(kind.matches(value), value, shape),
        TypeShape::Instance(name) | TypeShape::SelfRef(name) => {
            let matches = value
                .as_record()
                .is_some_and(|record| record.type_name() == name.as_str());
            expect(matches, value, shape)
        }
        TypeShape::Union(members) => {
            if members
                .iter()
                .any(|member| validate_value(value, member).is_ok())
            {
                Ok(())
            } else {
                Err(ShapeError::mismatch(shape, value))
            }
        }
        TypeShape::Sequence { kind, element } => match value {
            Value::Seq(actual, items) if actual == kind => validate_all(items, element),
            _ => Err(ShapeError::mismatch(shape, value)),
        },
        TypeShape::Mapping {
            kind,
            key,
            value: value_shape,
        } => match value {
            Value::Map(actual, entries) if kind.accepts(*actual) => {
                for (k, v) in entries {
                    validate_value(k, key)?;
                    validate_value(v, value_shape)?;
                }
                Ok(())
            }
            _ => Err(ShapeError::mismatch(shape, value)),
        },
        TypeShape::Tuple(positions) => match value {
            Value::Tuple(items) => {
                if items.len() != positions.len() {
                    return Err(ShapeError::Arity {
                        expected: positions.len(),
                        actual: items.len(),
                    });
                }
                for (item, position) in items.iter().zip(positions) {
                    validate_value(item, position)?;
                }
                Ok(())
            }
            _ => Err(ShapeError::mismatch(shape, value)),
        },
        TypeShape::VariadicTuple(element) => match value {
            Value::Tuple(items) => validate_all(items, element),
            _ => Err(ShapeError::mismatch(shape, value)),
        },
        TypeShape::Container { kind, element } => match value {
            Value::Container(actual, items) if actual == kind => {
                if !kind.is_iterable() {
                    return Err(ShapeError::NoHandler {
                        operation: Operation::Validation,
                        kind: kind.name().to_string(),
                    });
                }
                validate_all(items, element)
            }
            _ => Err(ShapeError::mismatch(shape, value)),
        },
    }
}

fn validate_all(items: &[Value], element: &TypeShape) -> Result<(), ShapeError> {
    items
        .iter()
        .try_for_each(|item| validate_value(item, element))
}

fn expect(ok: bool, value: &Value, shape: &TypeShape) -> Result<(), ShapeError> {
    if ok {
        Ok(())
    } else {
        Err(ShapeError::mismatch(shape, value))
    }
}
