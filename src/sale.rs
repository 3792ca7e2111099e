use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// The currency type used for all prices and sales totals
pub type Money = Decimal;

/// Converts an amount for plotting and ratios
pub(crate) fn as_f64(amount: Money) -> f64 {
    amount.to_f64().unwrap_or_default()
}

/// The identifier of the account that placed an order
///
/// Several rows may share one account; distinct accounts are what
/// the dashboard counts as orders.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single group sale
///
/// Every row of the sales export is one block of seats sold to an account,
/// attributed to exactly one event and one sales representative.
#[derive(Clone, Debug, PartialEq)]
pub struct Sale {
    pub(crate) event_code: String,
    pub(crate) added: NaiveDateTime,
    pub(crate) block_full_price: Money,
    pub(crate) num_seats: u32,
    pub(crate) account: AccountId,
    pub(crate) rep: String,
}

impl Sale {
    pub fn new(
        event_code: impl Into<String>,
        added: NaiveDateTime,
        block_full_price: Money,
        num_seats: u32,
        account: AccountId,
        rep: impl Into<String>,
    ) -> Self {
        Self {
            event_code: event_code.into(),
            added,
            block_full_price,
            num_seats,
            account,
            rep: rep.into(),
        }
    }

    /// The internal code of the event, e.g. `E240509`
    pub fn event_code(&self) -> &str {
        &self.event_code
    }

    /// The moment the block was added
    pub fn added(&self) -> NaiveDateTime {
        self.added
    }

    /// The calendar day the block was added
    /// No timezone conversion takes place.
    pub fn day(&self) -> NaiveDate {
        self.added.date()
    }

    /// The full price of the block
    pub fn block_full_price(&self) -> Money {
        self.block_full_price
    }

    pub fn num_seats(&self) -> u32 {
        self.num_seats
    }

    /// The account that bought the block
    pub fn account(&self) -> &AccountId {
        &self.account
    }

    /// The full name of the responsible sales representative
    pub fn rep(&self) -> &str {
        &self.rep
    }
}

/// One row of the sales export as it appears on disk
///
/// The timestamp stays textual here, since it is only parsed once an
/// encoding has been settled on.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub(crate) struct SaleRecord {
    pub(crate) event_code: String,
    pub(crate) add_datetime: String,
    /// Blank cells count as zero
    pub(crate) block_full_price: Option<Money>,
    /// Blank cells count as zero
    pub(crate) num_seats: Option<u32>,
    pub(crate) acct_id: AccountId,
    pub(crate) acct_rep_full_name: String,
}

impl From<&Sale> for SaleRecord {
    fn from(sale: &Sale) -> Self {
        Self {
            event_code: sale.event_code.clone(),
            add_datetime: sale.added.format("%Y-%m-%d %H:%M:%S").to_string(),
            block_full_price: Some(sale.block_full_price),
            num_seats: Some(sale.num_seats),
            acct_id: sale.account.clone(),
            acct_rep_full_name: sale.rep.clone(),
        }
    }
}
