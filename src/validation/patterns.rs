//! 用户输入格式检测
//!
//! 所有检测都要求整个输入匹配，任何输入都只返回 `bool`。

use once_cell::sync::Lazy;
use regex::Regex;

static ALNUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-zA-Z]*$").unwrap());
static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]*$").unwrap());
static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-zA-Z_]{5,16}$").unwrap());
static PASSWORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]{6,16}$").unwrap());
static LOWERCASE_ONLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]+$").unwrap());
static DIGITS_ONLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());
static NICKNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\x{4e00}-\x{9fa5}]{3,8}$").unwrap());
static MOBILE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((13[0-9])|(14[0-9])|(15[0-9])|(17[0-9])|(18[0-9]))[0-9]{8}$").unwrap()
});
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([a-z0-9A-Z]+[-|\.]?)+[a-z0-9A-Z]@([a-z0-9A-Z]+(-[a-z0-9A-Z]+)?\.)+[a-zA-Z]{2,}$",
    )
    .unwrap()
});

/// SQL 关键字黑名单检测
///
/// 转小写后只检查是否包含 `" delete "` 或 `" drop "`（两侧必须有空格）。
/// 这只是粗糙的关键字过滤：位于开头或结尾的关键字、注释绕过以及
/// `truncate` / `update` 等其他语句都不会被拦截，不能替代参数化查询。
pub fn is_safe_sql(sql: &str) -> bool {
    let sql = sql.to_lowercase();
    !(sql.contains(" delete ") || sql.contains(" drop "))
}

/// 仅字母和数字，长度位于 `[min_length, max_length]`
pub fn alnum_legal(content: &str, min_length: usize, max_length: usize) -> bool {
    ALNUM_RE.is_match(content) && (min_length..=max_length).contains(&content.len())
}

/// 仅数字，长度位于 `[min_length, max_length]`
pub fn numeric_legal(content: &str, min_length: usize, max_length: usize) -> bool {
    NUMERIC_RE.is_match(content) && (min_length..=max_length).contains(&content.len())
}

/// 用户名：字母、数字、下划线，5-16 位
pub fn username_legal(content: &str) -> bool {
    USERNAME_RE.is_match(content)
}

/// 密码：字母和数字，6-16 位，不能全为小写字母，也不能全为数字
pub fn password_legal(content: &str) -> bool {
    PASSWORD_RE.is_match(content)
        && !LOWERCASE_ONLY_RE.is_match(content)
        && !DIGITS_ONLY_RE.is_match(content)
}

/// 昵称：字母、数字、常用汉字（U+4E00-U+9FA5），3-8 个字符
pub fn nickname_legal(content: &str) -> bool {
    NICKNAME_RE.is_match(content)
}

/// 中国大陆手机号：13x/14x/15x/17x/18x 开头的 11 位数字
pub fn mobile_legal(content: &str) -> bool {
    MOBILE_RE.is_match(content)
}

/// 邮箱格式
pub fn email_legal(content: &str) -> bool {
    EMAIL_RE.is_match(content)
}
