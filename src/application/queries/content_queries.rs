//! Content Queries

use crate::domain::content::ContainerId;

/// 获取远端内容查询
#[derive(Debug, Clone)]
pub struct GetContent {
    pub container_id: ContainerId,
}
