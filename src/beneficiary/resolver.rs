use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::{ApiResult, BankingApi};
use crate::beneficiary::ResolveError;
use crate::models::{BeneficiaryInfo, BeneficiarySource, ResolvedBeneficiary};
use crate::types::BeneficiaryId;

/// Resolves beneficiary selections to full account details.
///
/// The detail endpoint is always tried first. When it fails, the entry from
/// the last loaded beneficiary list is used instead so a transient outage
/// never blocks a known recipient. Fallback results are marked `Cached`.
pub struct BeneficiaryResolver<A: BankingApi> {
    api: Arc<A>,
    saved: DashMap<BeneficiaryId, BeneficiaryInfo>
}

impl<A: BankingApi> BeneficiaryResolver<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            saved: DashMap::new()
        }
    }

    /// Replaces the saved list wholesale and returns the usable entries.
    pub async fn load_list(&self) -> ApiResult<Vec<BeneficiaryInfo>> {
        let payloads = self.api.beneficiaries().await?;
        let beneficiaries: Vec<BeneficiaryInfo> = payloads.into_iter()
            .filter_map(|payload| payload.into_info())
            .collect();

        self.saved.clear();

        for beneficiary in &beneficiaries {
            self.saved.insert(beneficiary.id.clone(), beneficiary.clone());
        }

        debug!("Loaded [{}] saved beneficiaries", beneficiaries.len());

        Ok(beneficiaries)
    }

    pub fn saved(&self, beneficiary_id: &str) -> Option<BeneficiaryInfo> {
        self.saved.get(beneficiary_id).map(|entry| entry.value().clone())
    }

    pub async fn resolve(&self, beneficiary_id: &str) -> Result<ResolvedBeneficiary, ResolveError> {
        let detail = self.api.beneficiary_detail(beneficiary_id, true).await
            .map(|payload| payload.into_info());

        match detail {
            Ok(Some(info)) => {
                return Ok(ResolvedBeneficiary { info, source: BeneficiarySource::Verified });
            }
            Ok(None) => {
                warn!("Beneficiary [{beneficiary_id}] detail was incomplete, using saved entry");
            }
            Err(error) => {
                warn!("Beneficiary [{beneficiary_id}] detail fetch failed, using saved entry: {error}");
            }
        }

        self.saved(beneficiary_id)
            .map(|info| ResolvedBeneficiary { info, source: BeneficiarySource::Cached })
            .ok_or_else(|| ResolveError::NotFound(beneficiary_id.to_string()))
    }
}
