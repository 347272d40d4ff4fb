//! Serde helpers for fields that only ever hold a primitive node but still
//! carry the `"type": "primitive"` tag on the wire.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum Tagged<T> {
    Primitive(T),
}

pub(crate) mod primitive {
    use super::Tagged;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T: Serialize, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        Tagged::Primitive(value).serialize(serializer)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let Tagged::Primitive(value) = Tagged::<T>::deserialize(deserializer)?;
        Ok(value)
    }
}

pub(crate) mod primitive_vec {
    use super::Tagged;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[allow(clippy::ptr_arg)]
    pub fn serialize<T: Serialize, S: Serializer>(values: &Vec<T>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(Tagged::Primitive))
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let tagged = Vec::<Tagged<T>>::deserialize(deserializer)?;
        Ok(tagged
            .into_iter()
            .map(|Tagged::Primitive(value)| value)
            .collect())
    }
}
