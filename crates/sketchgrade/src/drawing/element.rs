//! Drawing elements as they arrive on the wire, keyed by `gradingName`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::SubmissionError;
use crate::primitive::Primitive;

/// Position keys in priority order; objects often carry several spellings of the same
/// coordinate and only the first present one is kept.
const ANCHOR_KEYS: [[&str; 3]; 2] = [["x1", "left", "x"], ["y1", "top", "y"]];

/// One object of a drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawnElement {
    pub id: Option<String>,
    /// Initial objects placed by the question author are not graded.
    pub graded: bool,
    /// `None` for objects with no grading rule (rods, supports, labels, ...).
    pub primitive: Option<Primitive>,
}

impl DrawnElement {
    pub fn new(primitive: Primitive) -> Self {
        Self {
            id: None,
            graded: true,
            primitive: Some(primitive),
        }
    }

    /// Whether this element takes part in grading.
    #[inline]
    pub fn is_gradeable(&self) -> bool {
        self.graded && self.primitive.is_some()
    }

    /// The reference flagged this element as optional.
    pub fn is_optional(&self) -> bool {
        match &self.primitive {
            Some(Primitive::Point(p)) => p.optional_grading,
            Some(Primitive::Vector(v) | Primitive::DoubleHeadedVector(v)) => v.optional_grading,
            Some(Primitive::ArcVector(a)) => a.optional_grading,
            Some(Primitive::DistributedLoad(l)) => l.optional_grading,
            _ => false,
        }
    }

    /// Parse one wire object.
    pub fn from_value(value: &Value) -> Result<Self, SubmissionError> {
        let Value::Object(obj) = value else {
            return Err(SubmissionError::Json("drawing object is not a JSON object".into()));
        };
        let id = obj.get("id").and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        let graded = obj.get("graded").and_then(Value::as_bool).unwrap_or(true);
        let fields = normalized(obj);
        let primitive = match obj.get("gradingName").and_then(Value::as_str) {
            Some("vector") => Some(Primitive::Vector(typed(fields)?)),
            Some("double_headed_vector") => Some(Primitive::DoubleHeadedVector(typed(fields)?)),
            Some("arc_vector") => Some(Primitive::ArcVector(typed(fields)?)),
            Some("distTrianLoad") => Some(Primitive::DistributedLoad(typed(fields)?)),
            Some("controlledLine") => Some(Primitive::ControlledLine(typed(fields)?)),
            Some("controlledCurvedLine") => {
                Some(Primitive::ControlledCurvedLine(typed(fields)?))
            }
            Some("point") => Some(Primitive::Point(typed(fields)?)),
            _ => None,
        };
        Ok(Self {
            id,
            graded,
            primitive,
        })
    }
}

/// Wire name of a gradeable element.
pub fn grading_name(p: &Primitive) -> Option<&'static str> {
    Some(match p {
        Primitive::Vector(_) => "vector",
        Primitive::DoubleHeadedVector(_) => "double_headed_vector",
        Primitive::ArcVector(_) => "arc_vector",
        Primitive::DistributedLoad(_) => "distTrianLoad",
        Primitive::ControlledLine(_) => "controlledLine",
        Primitive::ControlledCurvedLine(_) => "controlledCurvedLine",
        Primitive::Point(_) => "point",
        _ => return None,
    })
}

fn normalized(obj: &Map<String, Value>) -> Value {
    let mut fields = obj.clone();
    for group in ANCHOR_KEYS {
        if let Some(keep) = group.iter().position(|k| obj.contains_key(*k)) {
            for k in &group[keep + 1..] {
                fields.remove(*k);
            }
        }
    }
    Value::Object(fields)
}

fn typed<T: DeserializeOwned>(fields: Value) -> Result<T, SubmissionError> {
    serde_json::from_value(fields).map_err(|e| SubmissionError::Json(e.to_string()))
}

/// Whether `submitted` satisfies `reference` (same kind, pixel tolerances).
pub fn element_matches(reference: &Primitive, submitted: &Primitive, tol: f64, angle_tol: f64) -> bool {
    use Primitive as P;
    match (reference, submitted) {
        (P::Vector(r), P::Vector(s)) => r.matches(s, tol, angle_tol, false),
        (P::DoubleHeadedVector(r), P::DoubleHeadedVector(s)) => r.matches(s, tol, angle_tol, true),
        (P::ArcVector(r), P::ArcVector(s)) => r.matches(s, tol),
        (P::DistributedLoad(r), P::DistributedLoad(s)) => r.matches(s, tol, angle_tol),
        (P::ControlledLine(r), P::ControlledLine(s)) => r.matches(s, tol),
        (P::ControlledCurvedLine(r), P::ControlledCurvedLine(s)) => r.matches(s, tol),
        (P::Point(r), P::Point(s)) => r.matches(s, tol),
        _ => false,
    }
}
