//! 上传对象时附带的 ACL 授权

use std::fmt;

use serde::Deserialize;

/// 预定义用户组
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupGrantee {
    /// 所有人（匿名访问）
    AllUsers,
    /// 任意已认证用户
    AuthenticatedUsers,
    /// 访问日志投递组
    LogDelivery,
}

impl GroupGrantee {
    pub fn uri(&self) -> &'static str {
        match self {
            GroupGrantee::AllUsers => "http://acs.amazonaws.com/groups/global/AllUsers",
            GroupGrantee::AuthenticatedUsers => {
                "http://acs.amazonaws.com/groups/global/AuthenticatedUsers"
            }
            GroupGrantee::LogDelivery => "http://acs.amazonaws.com/groups/s3/LogDelivery",
        }
    }

    /// `x-amz-grant-*` 请求头取值
    pub fn header_value(&self) -> String {
        format!("uri=\"{}\"", self.uri())
    }
}

/// 对象级权限
///
/// 对象上不存在 WRITE 权限，这里只列出 PutObject 支持的四种授权。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    FullControl,
    Read,
    ReadAcp,
    WriteAcp,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Permission::FullControl => "FULL_CONTROL",
            Permission::Read => "READ",
            Permission::ReadAcp => "READ_ACP",
            Permission::WriteAcp => "WRITE_ACP",
        };
        f.write_str(name)
    }
}

/// 单条授权
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub grantee: GroupGrantee,
    pub permission: Permission,
}

impl Grant {
    pub fn new(grantee: GroupGrantee, permission: Permission) -> Self {
        Self {
            grantee,
            permission,
        }
    }

    /// 公共读
    pub fn public_read() -> Self {
        Self::new(GroupGrantee::AllUsers, Permission::Read)
    }
}
