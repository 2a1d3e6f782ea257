use serde::{Deserialize, Deserializer, Serialize, de};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    #[serde(rename = "type")]
    pub kind: String,
}

/// 클라이언트는 카테고리 ID를 숫자로도, 카테고리 맵의 키처럼 문자열("3")로도 보낸다.
#[derive(Serialize, Debug, Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct CategoryId(pub i32);

impl<'de> Deserialize<'de> for CategoryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient_i32(deserializer).map(CategoryId)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

pub fn lenient_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => i32::try_from(n).map_err(de::Error::custom),
        NumberOrText::Text(s) => s.trim().parse::<i32>().map_err(de::Error::custom),
    }
}

/// id -> 이름. JSON으로는 {"1": "Science", ...} 객체가 된다.
pub type CategoryMap = BTreeMap<i32, String>;

pub fn category_map(categories: &[Category]) -> CategoryMap {
    categories
        .iter()
        .map(|c| (c.id.0, c.kind.clone()))
        .collect()
}
