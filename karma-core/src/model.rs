use crate::responses::BaseError;
use serde::Serialize;
use serde_json::{Map, Value};

/// A persisted record addressed by a numeric id.
///
/// Ids are assigned by storage; a model that was never stored carries `0`.
pub trait TModel: Serialize + Clone + Send + Sync + 'static {
	const TABLE: &'static str;

	fn id(&self) -> i64;
	fn set_id(&mut self, id: i64);
}

/// Key/value projection of any serializable record.
///
/// Used to hand records across layers with some fields stripped (passwords, ids) or extra fields attached.
pub trait ToDict: Serialize {
	/// `exclude` keys that are not present are ignored. `include` entries are merged last and win over existing keys.
	fn to_dict(&self, exclude: &[&str], include: Option<Map<String, Value>>) -> Result<Map<String, Value>, BaseError> {
		let Value::Object(mut data) = serde_json::to_value(self)? else {
			return Err(BaseError::InvalidProjection(std::any::type_name::<Self>()));
		};
		for key in exclude {
			data.remove(*key);
		}
		if let Some(include) = include {
			data.extend(include);
		}
		Ok(data)
	}
}

impl<T: Serialize + ?Sized> ToDict for T {}
