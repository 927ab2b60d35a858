use serde::{Serialize, Deserialize};

/// 引脚数据类型 (封闭集合)
/// `Any` 与所有类型双向兼容，其余类型仅与自身兼容。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinType {
    Execution,
    String,
    Number,
    Boolean,
    Address,
    Credentials,
    Array,
    Object,
    Any,
    /// 未识别的类型标签。反序列化时吸收未知值，绝不隐式转换。
    #[serde(other)]
    Unknown,
}

/// 引脚方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinDirection {
    Input,
    Output,
}

/// Compatibility relation over the closed `PinType` set.
///
/// Pure and total: `Any` absorbs in both directions, every other pair is
/// compatible only with itself. Convertible pairs (e.g. number -> string)
/// would be declared in the match below; none are today, so the relation
/// is symmetric as shipped. `Unknown` matches only itself and `Any`.
pub fn is_compatible(source: PinType, target: PinType) -> bool {
    match (source, target) {
        (PinType::Any, _) | (_, PinType::Any) => true,
        (s, t) => s == t,
    }
}
