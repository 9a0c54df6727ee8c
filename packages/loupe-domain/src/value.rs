use mongodb::bson::Bson;

/// Textual form of a scalar BSON value, `None` for anything without a
/// natural text rendering (nested values, null, binary).
pub fn scalar_text(value: &Bson) -> Option<String> {
	match value {
		Bson::String(text) => Some(text.clone()),
		Bson::Int32(number) => Some(number.to_string()),
		Bson::Int64(number) => Some(number.to_string()),
		Bson::Double(number) => Some(number.to_string()),
		Bson::Boolean(flag) => Some(flag.to_string()),
		Bson::ObjectId(oid) => Some(oid.to_hex()),
		Bson::DateTime(ts) => Some(ts.to_string()),
		_ => None,
	}
}

/// Integer coercion for ordering metadata. Booleans never coerce, numeric
/// strings parse, floats truncate.
pub fn coerce_i64(value: &Bson) -> Option<i64> {
	match value {
		Bson::Int32(number) => Some(i64::from(*number)),
		Bson::Int64(number) => Some(*number),
		Bson::Double(number) if number.is_finite() => Some(number.trunc() as i64),
		Bson::String(text) => {
			let trimmed = text.trim();

			trimmed.parse::<i64>().ok().or_else(|| {
				trimmed.parse::<f64>().ok().filter(|number| number.is_finite()).map(|number| number.trunc() as i64)
			})
		},
		_ => None,
	}
}

/// Numeric coercion for the timestamp ordering field. Non-numeric values
/// yield `None`; the caller substitutes zero.
pub fn coerce_f64(value: &Bson) -> Option<f64> {
	match value {
		Bson::Int32(number) => Some(f64::from(*number)),
		Bson::Int64(number) => Some(*number as f64),
		Bson::Double(number) if number.is_finite() => Some(*number),
		Bson::String(text) => text.trim().parse::<f64>().ok().filter(|number| number.is_finite()),
		_ => None,
	}
}

/// Relaxed Extended JSON rendering of an arbitrary BSON value.
pub fn render_json(value: &Bson) -> String {
	value.clone().into_relaxed_extjson().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn booleans_never_coerce_to_integers() {
		assert_eq!(coerce_i64(&Bson::Boolean(true)), None);
		assert_eq!(coerce_i64(&Bson::Boolean(false)), None);
	}

	#[test]
	fn numeric_strings_parse_and_floats_truncate() {
		assert_eq!(coerce_i64(&Bson::String("42".to_string())), Some(42));
		assert_eq!(coerce_i64(&Bson::String(" 7.9 ".to_string())), Some(7));
		assert_eq!(coerce_i64(&Bson::Double(3.7)), Some(3));
		assert_eq!(coerce_i64(&Bson::Double(f64::NAN)), None);
		assert_eq!(coerce_i64(&Bson::String("batch".to_string())), None);
	}

	#[test]
	fn timestamps_default_to_none_for_non_numeric_values() {
		assert_eq!(coerce_f64(&Bson::String("12.5".to_string())), Some(12.5));
		assert_eq!(coerce_f64(&Bson::Boolean(true)), None);
		assert_eq!(coerce_f64(&Bson::Null), None);
	}
}
