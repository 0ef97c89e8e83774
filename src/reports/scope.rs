use uuid::Uuid;

use crate::{config::ReportsConfig, db::repos::LabelFilter};

/// Which of the three fixed report shapes a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeRole {
    Platform,
    Company,
    Manufacturer,
}

/// Role context deciding which manufacturers' labels a report may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportScope {
    /// Super admin view. Explicit manufacturers win over companies; neither
    /// means every manufacturer.
    Platform {
        company_ids: Vec<Uuid>,
        manufacturer_ids: Vec<Uuid>,
    },
    /// Company admin view over the company's active manufacturers, narrowed to
    /// `manufacturer_ids` when given.
    Company {
        company_id: Uuid,
        manufacturer_ids: Vec<Uuid>,
    },
    /// Manufacturer admin view of their own labels.
    Manufacturer {
        manufacturer_id: Uuid,
        account_id: Uuid,
    },
}

impl ReportScope {
    pub fn role(&self) -> ScopeRole {
        match self {
            ReportScope::Platform { .. } => ScopeRole::Platform,
            ReportScope::Company { .. } => ScopeRole::Company,
            ReportScope::Manufacturer { .. } => ScopeRole::Manufacturer,
        }
    }

    /// Month lookback for this scope's statistics report.
    pub fn lookback_months(&self, config: &ReportsConfig) -> u32 {
        match self.role() {
            ScopeRole::Platform => config.platform_lookback_months,
            ScopeRole::Company => config.company_lookback_months,
            ScopeRole::Manufacturer => config.manufacturer_lookback_months,
        }
    }

    /// Apply scope-imposed restrictions to caller-supplied filters.
    ///
    /// Manufacturer reports only ever count the requesting account's labels.
    pub fn constrain(&self, mut filter: LabelFilter) -> LabelFilter {
        if let ReportScope::Manufacturer { account_id, .. } = self {
            filter.user_ids = vec![*account_id];
        }
        filter
    }
}

/// Narrow a company's manufacturers to the requested ones, if any were requested.
pub(crate) fn narrow(owned: Vec<Uuid>, requested: &[Uuid]) -> Vec<Uuid> {
    if requested.is_empty() {
        return owned;
    }
    owned
        .into_iter()
        .filter(|id| requested.contains(id))
        .collect()
}
