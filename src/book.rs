use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::{Mutex, RwLock};
use tracing::info;

use crate::config::RentConfig;
use crate::decimal::Money;
use crate::errors::{RentError, Result};
use crate::lateness::LatePaymentSummary;
use crate::ledger::TenantLedger;
use crate::payments::{AllocationResult, ReversalResult};
use crate::records::{Lease, Payment};
use crate::types::{PaymentId, TenantId};

pub type SharedLedger = Arc<Mutex<TenantLedger>>;

/// every tenant ledger, each behind its own lock
///
/// Payments for one tenant are applied one at a time; different tenants
/// never wait on each other. The outer map lock is only held long enough to
/// find or insert a ledger.
pub struct LedgerBook {
    config: RentConfig,
    ledgers: RwLock<HashMap<TenantId, SharedLedger>>,
}

impl LedgerBook {
    pub fn new(config: RentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ledgers: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &RentConfig {
        &self.config
    }

    /// open a ledger for the lease's tenant, or return the one already open
    pub fn open(&self, lease: Lease) -> Result<SharedLedger> {
        let tenant_id = lease.tenant_id;
        if let Some(existing) = self.ledgers.read().get(&tenant_id) {
            return Ok(existing.clone());
        }

        let mut ledgers = self.ledgers.write();
        if let Some(existing) = ledgers.get(&tenant_id) {
            return Ok(existing.clone());
        }
        let ledger = Arc::new(Mutex::new(TenantLedger::new(lease, self.config.clone())?));
        ledgers.insert(tenant_id, ledger.clone());
        info!(tenant_id = %tenant_id, "tenant ledger opened");
        Ok(ledger)
    }

    /// register an already restored ledger, replacing any open one
    pub fn insert(&self, ledger: TenantLedger) -> SharedLedger {
        let tenant_id = ledger.tenant_id();
        let shared = Arc::new(Mutex::new(ledger));
        self.ledgers.write().insert(tenant_id, shared.clone());
        shared
    }

    pub fn ledger(&self, tenant_id: TenantId) -> Result<SharedLedger> {
        self.ledgers
            .read()
            .get(&tenant_id)
            .cloned()
            .ok_or(RentError::LedgerNotFound { tenant_id })
    }

    pub fn tenants(&self) -> Vec<TenantId> {
        self.ledgers.read().keys().copied().collect()
    }

    /// snapshot of the open ledgers without holding the map lock
    fn all(&self) -> Vec<SharedLedger> {
        self.ledgers.read().values().cloned().collect()
    }

    pub fn record_payment(&self, payment: Payment) -> Result<AllocationResult> {
        let ledger = self.ledger(payment.tenant_id)?;
        let mut guard = ledger.lock();
        guard.record_payment(payment)
    }

    pub fn reverse_payment(&self, tenant_id: TenantId, payment_id: PaymentId) -> Result<ReversalResult> {
        let ledger = self.ledger(tenant_id)?;
        let mut guard = ledger.lock();
        guard.reverse_payment(payment_id)
    }

    /// bring every ledger's periods up to `until`; returns periods added
    pub fn sync_all(&self, until: NaiveDate) -> u32 {
        self.all().iter().map(|l| l.lock().sync_periods(until)).sum()
    }

    /// assess late fees across every ledger; returns the total assessed
    pub fn assess_all_late_fees(&self, today: NaiveDate) -> Money {
        self.all().iter().map(|l| l.lock().assess_late_fees(today)).sum()
    }

    pub fn late_payment_summary(&self, tenant_id: TenantId, today: NaiveDate) -> Result<LatePaymentSummary> {
        let ledger = self.ledger(tenant_id)?;
        let summary = ledger.lock().late_payment_summary(today);
        Ok(summary)
    }

    /// tenants with at least one late period
    pub fn late_tenants(&self, today: NaiveDate) -> Vec<(TenantId, LatePaymentSummary)> {
        self.all()
            .iter()
            .filter_map(|l| {
                let guard = l.lock();
                let summary = guard.late_payment_summary(today);
                summary.has_late_periods().then(|| (guard.tenant_id(), summary))
            })
            .collect()
    }
}
