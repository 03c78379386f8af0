pub mod company;
pub mod job;

use serde::{Deserialize, Deserializer};

/// 区分 "字段缺省" 与 "显式设为 null"：缺省为 None，null 为 Some(None)
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
