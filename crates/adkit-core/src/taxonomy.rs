//! Analytics event taxonomy
//!
//! A fixed-but-extensible vocabulary of event-type identifiers and
//! parameter keys. The constants are documentation-level contracts:
//! nothing here is enforced. Unknown event types and unknown or missing
//! parameter keys are always accepted (forward compatibility with
//! server-defined events); only well-known keys carry an expected value
//! kind, and mismatches produce advisory notes, never errors.
//!
//! Both tables are append-only: adding a new identifier must never
//! change the meaning of an existing one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------
// Authentication events
// ---------------------------------------------------------------------

/// The user logged in to an existing account.
///
/// Suggested parameters: [`PARAM_USER_ACCOUNT_ID`].
pub const EVENT_USER_LOGGED_IN: &str = "user.logged_in";

/// The user finished a registration flow and created a new account.
///
/// Suggested parameters: [`PARAM_USER_ACCOUNT_ID`].
pub const EVENT_USER_CREATED_ACCOUNT: &str = "user.created_account";

// ---------------------------------------------------------------------
// Content events
// ---------------------------------------------------------------------

/// The user viewed a specific piece of content.
///
/// For views of saleable products, prefer [`EVENT_USER_VIEWED_PRODUCT`].
/// Suggested parameters: [`PARAM_CONTENT_ID`].
pub const EVENT_USER_VIEWED_CONTENT: &str = "content.viewed";

/// The user executed a search query.
///
/// Suggested parameters: [`PARAM_SEARCH_QUERY`].
pub const EVENT_USER_EXECUTED_SEARCH: &str = "content.search";

// ---------------------------------------------------------------------
// Gaming events
// ---------------------------------------------------------------------

/// The user completed a tutorial or introduction sequence.
pub const EVENT_USER_COMPLETED_TUTORIAL: &str = "game.tutorial_completed";

/// The user completed a given level or game sequence.
///
/// Suggested parameters: [`PARAM_COMPLETED_LEVEL`].
pub const EVENT_USER_COMPLETED_LEVEL: &str = "game.level_completed";

/// The user unlocked a particular achievement.
///
/// Suggested parameters: [`PARAM_COMPLETED_ACHIEVEMENT`].
pub const EVENT_USER_COMPLETED_ACHIEVEMENT: &str = "game.achievement_unlocked";

/// The user spent virtual currency on an in-game purchase.
///
/// Suggested parameters: [`PARAM_VIRTUAL_CURRENCY_AMOUNT`],
/// [`PARAM_VIRTUAL_CURRENCY_NAME`].
pub const EVENT_USER_SPENT_VIRTUAL_CURRENCY: &str = "game.virtual_currency_spent";

// ---------------------------------------------------------------------
// Commerce events
// ---------------------------------------------------------------------

/// The user viewed a saleable product.
///
/// For general content, prefer [`EVENT_USER_VIEWED_CONTENT`].
/// Suggested parameters: [`PARAM_PRODUCT_ID`].
pub const EVENT_USER_VIEWED_PRODUCT: &str = "commerce.product_viewed";

/// The user added a product to their shopping cart.
///
/// Suggested parameters: [`PARAM_PRODUCT_ID`].
pub const EVENT_USER_ADDED_ITEM_TO_CART: &str = "commerce.cart_item_added";

/// The user added a product to their wishlist.
///
/// Suggested parameters: [`PARAM_PRODUCT_ID`].
pub const EVENT_USER_ADDED_ITEM_TO_WISHLIST: &str = "commerce.wishlist_item_added";

/// The user provided payment information.
///
/// Do not attach personally identifiable or financial information.
pub const EVENT_USER_PROVIDED_PAYMENT_INFO: &str = "commerce.payment_info_provided";

/// The user began a check-out / purchase process.
///
/// Suggested parameters: [`PARAM_PRODUCT_ID`], [`PARAM_REVENUE_AMOUNT`],
/// [`PARAM_REVENUE_CURRENCY`].
pub const EVENT_USER_BEGAN_CHECKOUT: &str = "commerce.checkout_started";

/// The user completed a check-out / purchase.
///
/// Suggested parameters: [`PARAM_CHECKOUT_TRANSACTION_ID`],
/// [`PARAM_PRODUCT_ID`], [`PARAM_REVENUE_AMOUNT`],
/// [`PARAM_REVENUE_CURRENCY`].
pub const EVENT_USER_COMPLETED_CHECKOUT: &str = "commerce.checkout_completed";

/// The user completed a platform-store in-app purchase.
///
/// Suggested parameters: [`PARAM_PRODUCT_ID`],
/// [`PARAM_STORE_TRANSACTION_ID`], [`PARAM_STORE_RECEIPT`],
/// [`PARAM_REVENUE_AMOUNT`], [`PARAM_REVENUE_CURRENCY`].
pub const EVENT_USER_COMPLETED_IAP: &str = "commerce.iap_completed";

/// The user created a reservation or other date-specific event.
///
/// Suggested parameters: [`PARAM_PRODUCT_ID`],
/// [`PARAM_RESERVATION_START`], [`PARAM_RESERVATION_END`].
pub const EVENT_USER_CREATED_RESERVATION: &str = "commerce.reservation_created";

// ---------------------------------------------------------------------
// Social events
// ---------------------------------------------------------------------

/// The user sent an invitation to use the app to a friend.
pub const EVENT_USER_SENT_INVITATION: &str = "social.invitation_sent";

/// The user shared a link or deep-link to content within the app.
pub const EVENT_USER_SHARED_LINK: &str = "social.link_shared";

/// All known event-type identifiers, in registry order
pub const KNOWN_EVENT_TYPES: &[&str] = &[
    EVENT_USER_LOGGED_IN,
    EVENT_USER_CREATED_ACCOUNT,
    EVENT_USER_VIEWED_CONTENT,
    EVENT_USER_EXECUTED_SEARCH,
    EVENT_USER_COMPLETED_TUTORIAL,
    EVENT_USER_COMPLETED_LEVEL,
    EVENT_USER_COMPLETED_ACHIEVEMENT,
    EVENT_USER_SPENT_VIRTUAL_CURRENCY,
    EVENT_USER_VIEWED_PRODUCT,
    EVENT_USER_ADDED_ITEM_TO_CART,
    EVENT_USER_ADDED_ITEM_TO_WISHLIST,
    EVENT_USER_PROVIDED_PAYMENT_INFO,
    EVENT_USER_BEGAN_CHECKOUT,
    EVENT_USER_COMPLETED_CHECKOUT,
    EVENT_USER_COMPLETED_IAP,
    EVENT_USER_CREATED_RESERVATION,
    EVENT_USER_SENT_INVITATION,
    EVENT_USER_SHARED_LINK,
];

// ---------------------------------------------------------------------
// Parameter keys
// ---------------------------------------------------------------------

/// Username or account ID of the user. Expects [`ParamKind::Text`].
pub const PARAM_USER_ACCOUNT_ID: &str = "user_account_id";

/// Identifier of a viewed piece of content. Expects [`ParamKind::Text`].
///
/// For particular products, prefer a SKU under [`PARAM_PRODUCT_ID`].
pub const PARAM_CONTENT_ID: &str = "content_id";

/// Search query executed by the user. Expects [`ParamKind::Text`].
pub const PARAM_SEARCH_QUERY: &str = "search_query";

/// Identifier of the level just completed. Expects [`ParamKind::Text`].
pub const PARAM_COMPLETED_LEVEL: &str = "completed_level";

/// Identifier of the achievement just unlocked. Expects [`ParamKind::Text`].
pub const PARAM_COMPLETED_ACHIEVEMENT: &str = "completed_achievement";

/// Amount of virtual currency spent. Expects [`ParamKind::Number`].
pub const PARAM_VIRTUAL_CURRENCY_AMOUNT: &str = "virtual_currency_amount";

/// Name of the virtual currency spent. Expects [`ParamKind::Text`].
pub const PARAM_VIRTUAL_CURRENCY_NAME: &str = "virtual_currency_name";

/// Product name, SKU, or inventory ID. Expects [`ParamKind::Text`].
///
/// For non-product content, prefer [`PARAM_CONTENT_ID`].
pub const PARAM_PRODUCT_ID: &str = "product_id";

/// Revenue generated by a purchase event. Expects [`ParamKind::Number`].
pub const PARAM_REVENUE_AMOUNT: &str = "revenue_amount";

/// Currency of the revenue event, ideally an ISO 4217 3-letter code.
/// Expects [`ParamKind::Text`].
pub const PARAM_REVENUE_CURRENCY: &str = "revenue_currency";

/// Unique identifier of the checkout transaction. Expects [`ParamKind::Text`].
pub const PARAM_CHECKOUT_TRANSACTION_ID: &str = "checkout_transaction_id";

/// Platform-store transaction ID for an in-app purchase.
/// Expects [`ParamKind::Text`].
pub const PARAM_STORE_TRANSACTION_ID: &str = "store_transaction_id";

/// Platform-store receipt for an in-app purchase. Expects [`ParamKind::Blob`].
pub const PARAM_STORE_RECEIPT: &str = "store_receipt";

/// Start date of a reservation. Expects [`ParamKind::Timestamp`].
pub const PARAM_RESERVATION_START: &str = "reservation_start";

/// End date of a reservation. Expects [`ParamKind::Timestamp`].
///
/// For single-day reservations, [`PARAM_RESERVATION_START`] alone is fine.
pub const PARAM_RESERVATION_END: &str = "reservation_end";

/// All known parameter keys, in registry order
pub const KNOWN_PARAMETER_KEYS: &[&str] = &[
    PARAM_USER_ACCOUNT_ID,
    PARAM_CONTENT_ID,
    PARAM_SEARCH_QUERY,
    PARAM_COMPLETED_LEVEL,
    PARAM_COMPLETED_ACHIEVEMENT,
    PARAM_VIRTUAL_CURRENCY_AMOUNT,
    PARAM_VIRTUAL_CURRENCY_NAME,
    PARAM_PRODUCT_ID,
    PARAM_REVENUE_AMOUNT,
    PARAM_REVENUE_CURRENCY,
    PARAM_CHECKOUT_TRANSACTION_ID,
    PARAM_STORE_TRANSACTION_ID,
    PARAM_STORE_RECEIPT,
    PARAM_RESERVATION_START,
    PARAM_RESERVATION_END,
];

/// Expected value kind for a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// String value
    Text,
    /// Numeric value
    Number,
    /// Opaque byte blob
    Blob,
    /// Date/time value
    Timestamp,
}

/// Expected value kind for a well-known parameter key
///
/// Returns `None` for keys outside the documented taxonomy; such keys
/// are forwarded unchanged and carry no expectation.
pub fn expected_kind(key: &str) -> Option<ParamKind> {
    match key {
        PARAM_USER_ACCOUNT_ID
        | PARAM_CONTENT_ID
        | PARAM_SEARCH_QUERY
        | PARAM_COMPLETED_LEVEL
        | PARAM_COMPLETED_ACHIEVEMENT
        | PARAM_VIRTUAL_CURRENCY_NAME
        | PARAM_PRODUCT_ID
        | PARAM_REVENUE_CURRENCY
        | PARAM_CHECKOUT_TRANSACTION_ID
        | PARAM_STORE_TRANSACTION_ID => Some(ParamKind::Text),
        PARAM_VIRTUAL_CURRENCY_AMOUNT | PARAM_REVENUE_AMOUNT => Some(ParamKind::Number),
        PARAM_STORE_RECEIPT => Some(ParamKind::Blob),
        PARAM_RESERVATION_START | PARAM_RESERVATION_END => Some(ParamKind::Timestamp),
        _ => None,
    }
}

/// Suggested parameter keys for a well-known event type
///
/// Advisory only; callers may attach any keys, or none.
pub fn suggested_keys(event_type: &str) -> &'static [&'static str] {
    match event_type {
        EVENT_USER_LOGGED_IN | EVENT_USER_CREATED_ACCOUNT => &[PARAM_USER_ACCOUNT_ID],
        EVENT_USER_VIEWED_CONTENT => &[PARAM_CONTENT_ID],
        EVENT_USER_EXECUTED_SEARCH => &[PARAM_SEARCH_QUERY],
        EVENT_USER_COMPLETED_LEVEL => &[PARAM_COMPLETED_LEVEL],
        EVENT_USER_COMPLETED_ACHIEVEMENT => &[PARAM_COMPLETED_ACHIEVEMENT],
        EVENT_USER_SPENT_VIRTUAL_CURRENCY => {
            &[PARAM_VIRTUAL_CURRENCY_AMOUNT, PARAM_VIRTUAL_CURRENCY_NAME]
        }
        EVENT_USER_VIEWED_PRODUCT
        | EVENT_USER_ADDED_ITEM_TO_CART
        | EVENT_USER_ADDED_ITEM_TO_WISHLIST => &[PARAM_PRODUCT_ID],
        EVENT_USER_BEGAN_CHECKOUT => {
            &[PARAM_PRODUCT_ID, PARAM_REVENUE_AMOUNT, PARAM_REVENUE_CURRENCY]
        }
        EVENT_USER_COMPLETED_CHECKOUT => &[
            PARAM_CHECKOUT_TRANSACTION_ID,
            PARAM_PRODUCT_ID,
            PARAM_REVENUE_AMOUNT,
            PARAM_REVENUE_CURRENCY,
        ],
        EVENT_USER_COMPLETED_IAP => &[
            PARAM_PRODUCT_ID,
            PARAM_STORE_TRANSACTION_ID,
            PARAM_STORE_RECEIPT,
            PARAM_REVENUE_AMOUNT,
            PARAM_REVENUE_CURRENCY,
        ],
        EVENT_USER_CREATED_RESERVATION => {
            &[PARAM_PRODUCT_ID, PARAM_RESERVATION_START, PARAM_RESERVATION_END]
        }
        _ => &[],
    }
}

/// A parameter value attached to an event record
///
/// Serialize-only: the untagged wire shape (a timestamp becomes an
/// RFC 3339 string, indistinguishable from text) cannot be read back
/// without guessing, and nothing on this side ever consumes records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// String value
    Text(String),
    /// Numeric value
    Number(f64),
    /// Opaque byte blob
    Blob(Vec<u8>),
    /// Date/time value
    Timestamp(DateTime<Utc>),
}

impl ParamValue {
    /// The kind of this value, for comparison against [`expected_kind`]
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Text(_) => ParamKind::Text,
            ParamValue::Number(_) => ParamKind::Number,
            ParamValue::Blob(_) => ParamKind::Blob,
            ParamValue::Timestamp(_) => ParamKind::Timestamp,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(value as f64)
    }
}

impl From<Vec<u8>> for ParamValue {
    fn from(value: Vec<u8>) -> Self {
        ParamValue::Blob(value)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(value: DateTime<Utc>) -> Self {
        ParamValue::Timestamp(value)
    }
}

/// A single tracked analytics event
///
/// Serialize-only, like [`ParamValue`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    /// Event-type identifier; any string, not restricted to
    /// [`KNOWN_EVENT_TYPES`]
    pub event_type: String,
    /// Open parameter mapping; no keys are required
    pub parameters: HashMap<String, ParamValue>,
    /// When the event was recorded on the client
    pub recorded_at: DateTime<Utc>,
}

impl EventRecord {
    /// Create a new event record timestamped now
    pub fn new(event_type: impl Into<String>, parameters: HashMap<String, ParamValue>) -> Self {
        Self {
            event_type: event_type.into(),
            parameters,
            recorded_at: Utc::now(),
        }
    }
}

/// Advisory taxonomy notes for a record
///
/// Returns one note per unknown event type, unknown key, or value-kind
/// mismatch. Notes are for logging only; the record is forwarded
/// unchanged regardless.
pub fn advisory_notes(record: &EventRecord) -> Vec<String> {
    let mut notes = Vec::new();

    if !KNOWN_EVENT_TYPES.contains(&record.event_type.as_str()) {
        notes.push(format!(
            "event type {:?} is not in the known taxonomy (forwarded as-is)",
            record.event_type
        ));
    }

    for (key, value) in &record.parameters {
        match expected_kind(key) {
            Some(kind) if kind != value.kind() => notes.push(format!(
                "parameter {:?} documents {:?} values but carries {:?}",
                key,
                kind,
                value.kind()
            )),
            None => notes.push(format!(
                "parameter {:?} is not a documented key (forwarded as-is)",
                key
            )),
            _ => {}
        }
    }

    notes
}
