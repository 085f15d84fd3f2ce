// ==========================================
// 自发货运费核算系统 - 功能开关
// ==========================================
// 上传/核算/导出前由调用方检查，与核算正确性无关
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    Upload,
    Process,
    Export,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Upload => write!(f, "UPLOAD"),
            Capability::Process => write!(f, "PROCESS"),
            Capability::Export => write!(f, "EXPORT"),
        }
    }
}

pub trait CapabilityGate: Send + Sync {
    fn allows(&self, capability: Capability) -> bool;
}

/// 全部放行
#[derive(Debug, Default)]
pub struct AllowAll;

impl CapabilityGate for AllowAll {
    fn allows(&self, _capability: Capability) -> bool {
        true
    }
}

/// 仅放行指定功能
#[derive(Debug, Default)]
pub struct StaticGate {
    allowed: HashSet<Capability>,
}

impl StaticGate {
    pub fn new<I: IntoIterator<Item = Capability>>(allowed: I) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }
}

impl CapabilityGate for StaticGate {
    fn allows(&self, capability: Capability) -> bool {
        self.allowed.contains(&capability)
    }
}
