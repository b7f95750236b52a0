//! 输入格式检测工具
//!
//! 无状态的纯函数：文本数值类型识别、SQL 关键字检测以及
//! 用户名 / 密码 / 昵称 / 手机号 / 邮箱等常见输入的格式检测。

mod patterns;
mod types;

pub use patterns::{
    alnum_legal, email_legal, is_safe_sql, mobile_legal, nickname_legal, numeric_legal,
    password_legal, username_legal,
};
pub use types::{ObjectType, ObjectValue, ParsedValue, classify_text, classify_value, parse_value};
