use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Direction of an envelope, from the point of view of the ledger owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnvelopeType {
    Sent,
    Received,
}

impl EnvelopeType {
    /// Returns the canonical string used by the backend in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "SENT",
            Self::Received => "RECEIVED",
        }
    }
}

impl std::str::FromStr for EnvelopeType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "SENT" | "sent" => Ok(Self::Sent),
            "RECEIVED" | "received" => Ok(Self::Received),
            other => Err(format!("unsupported envelope type: {other}")),
        }
    }
}

/// Paging metadata returned alongside every list endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub empty: bool,
    pub sorted: bool,
    pub unsorted: bool,
}

/// A page of results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub size: u32,
    #[serde(default)]
    pub sort: Sort,
    pub total_count: u64,
    pub total_page: u32,
}

impl<T> Page<T> {
    /// Whether a page after this one exists.
    pub fn has_next(&self) -> bool {
        !self.data.is_empty()
            && self
                .page
                .checked_add(1)
                .is_some_and(|next| next < self.total_page)
    }
}

pub mod error {
    use super::*;

    /// Structured error body the backend sends with non-2xx responses.
    ///
    /// Only `errorCode` is required; anything else the server adds is
    /// ignored.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ServerErrorResponse {
        pub error_code: String,
        #[serde(default)]
        pub reason: Option<String>,
    }
}

pub mod friend {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Friend {
        pub id: i64,
        pub name: String,
        #[serde(default)]
        pub phone_number: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Relationship {
        pub id: i64,
        pub relation: String,
        #[serde(default)]
        pub description: Option<String>,
    }

    /// Link between a friend and a relationship, with an optional free-form
    /// label when the user picked "other".
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FriendRelationship {
        pub id: i64,
        pub friend_id: i64,
        pub relationship_id: i64,
        #[serde(default)]
        pub custom_relation: Option<String>,
    }

    /// Body of `PATCH friends/{id}`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FriendRequest {
        pub name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub phone_number: Option<String>,
        pub relationship_id: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub custom_relation: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FriendIdResponse {
        pub id: i64,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryConfig {
        pub id: i64,
        pub seq: i32,
        pub name: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryAssignment {
        pub id: i64,
        pub seq: i32,
        pub category: String,
        #[serde(default)]
        pub custom_category: Option<String>,
    }
}

pub mod envelope {
    use super::{
        category::CategoryAssignment,
        friend::{Friend, FriendRelationship, Relationship},
        *,
    };

    /// Default relations expanded by the search endpoint.
    pub const DEFAULT_SEARCH_INCLUDE: &str = "CATEGORY,FRIEND,RELATIONSHIP,FRIEND_RELATIONSHIP";

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Envelope {
        pub id: i64,
        pub uid: i64,
        #[serde(rename = "type")]
        pub kind: EnvelopeType,
        pub amount: i64,
        #[serde(default)]
        pub gift: Option<String>,
        #[serde(default)]
        pub memo: Option<String>,
        #[serde(default)]
        pub has_visited: Option<bool>,
        pub handed_over_at: NaiveDateTime,
    }

    /// Per-friend aggregate returned by `envelopes/friend-statistics`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FriendStatistics {
        pub friend: Friend,
        pub relationship: Relationship,
        #[serde(default)]
        pub recent_envelope: Option<RecentEnvelope>,
        pub total_sent_amounts: i64,
        pub total_received_amounts: i64,
    }

    impl FriendStatistics {
        /// Received minus sent; positive when the user is ahead.
        pub fn balance(&self) -> i64 {
            self.total_received_amounts
                .saturating_sub(self.total_sent_amounts)
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RecentEnvelope {
        pub category: String,
        pub handed_over_at: NaiveDateTime,
    }

    pub type EnvelopesListResponse = Page<FriendStatistics>;

    /// Filters for `envelopes/friend-statistics`.
    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct EnvelopesListQuery {
        pub friend_ids: Vec<i64>,
        pub from_total_amounts: Option<i64>,
        pub to_total_amounts: Option<i64>,
        pub page: Option<u32>,
        pub size: Option<u32>,
        pub sort: Option<String>,
    }

    impl EnvelopesListQuery {
        /// Query-string pairs. List parameters are repeated once per value.
        pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
            let mut pairs: Vec<(&'static str, String)> = self
                .friend_ids
                .iter()
                .map(|id| ("friendIds", id.to_string()))
                .collect();
            push_opt(&mut pairs, "fromTotalAmounts", self.from_total_amounts);
            push_opt(&mut pairs, "toTotalAmounts", self.to_total_amounts);
            push_opt(&mut pairs, "page", self.page);
            push_opt(&mut pairs, "size", self.size);
            push_opt(&mut pairs, "sort", self.sort.as_ref());
            pairs
        }
    }

    /// Filters for `GET envelopes`.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct SearchEnvelopeQuery {
        pub friend_ids: Vec<i64>,
        pub ledger_id: Option<i64>,
        pub types: Vec<EnvelopeType>,
        pub include: String,
        pub from_amount: Option<i64>,
        pub to_amount: Option<i64>,
        pub page: Option<u32>,
        pub size: Option<u32>,
        pub sort: Option<String>,
    }

    impl Default for SearchEnvelopeQuery {
        fn default() -> Self {
            Self {
                friend_ids: Vec::new(),
                ledger_id: None,
                types: Vec::new(),
                include: DEFAULT_SEARCH_INCLUDE.to_string(),
                from_amount: None,
                to_amount: None,
                page: None,
                size: None,
                sort: None,
            }
        }
    }

    impl SearchEnvelopeQuery {
        pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
            let mut pairs: Vec<(&'static str, String)> = self
                .friend_ids
                .iter()
                .map(|id| ("friendIds", id.to_string()))
                .collect();
            push_opt(&mut pairs, "ledgerId", self.ledger_id);
            if !self.types.is_empty() {
                let types = self
                    .types
                    .iter()
                    .map(|kind| kind.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                pairs.push(("type", types));
            }
            pairs.push(("include", self.include.clone()));
            push_opt(&mut pairs, "fromAmount", self.from_amount);
            push_opt(&mut pairs, "toAmount", self.to_amount);
            push_opt(&mut pairs, "page", self.page);
            push_opt(&mut pairs, "size", self.size);
            push_opt(&mut pairs, "sort", self.sort.as_ref());
            pairs
        }
    }

    fn push_opt<V: ToString>(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<V>) {
        if let Some(value) = value {
            pairs.push((key, value.to_string()));
        }
    }

    /// One search hit. Which relations are filled depends on `include`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EnvelopeSearchItem {
        pub envelope: Envelope,
        #[serde(default)]
        pub category: Option<CategoryAssignment>,
        #[serde(default)]
        pub friend: Option<Friend>,
        #[serde(default)]
        pub relationship: Option<Relationship>,
        #[serde(default)]
        pub friend_relationship: Option<FriendRelationship>,
    }

    pub type SearchEnvelopeResponse = Page<EnvelopeSearchItem>;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EnvelopeDetailResponse {
        pub envelope: Envelope,
        pub category: CategoryAssignment,
        pub friend: Friend,
        pub relationship: Relationship,
        pub friend_relationship: FriendRelationship,
    }

    /// Category selection inside an envelope request.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryRequest {
        pub id: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub custom_category: Option<String>,
    }

    /// Body for creating or editing an envelope.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EnvelopeRequest {
        #[serde(rename = "type")]
        pub kind: EnvelopeType,
        pub friend_id: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub ledger_id: Option<i64>,
        pub amount: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub gift: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub memo: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub has_visited: Option<bool>,
        pub handed_over_at: NaiveDateTime,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<CategoryRequest>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateEnvelopeResponse {
        pub id: i64,
        pub uid: i64,
        #[serde(rename = "type")]
        pub kind: EnvelopeType,
        pub amount: i64,
        pub handed_over_at: NaiveDateTime,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct RelationshipListResponse {
        pub relationships: Vec<Relationship>,
    }
}

pub mod vote {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PopularVote {
        pub id: i64,
        pub category: String,
        pub count: i32,
        pub is_modified: bool,
    }
}

pub mod user {
    use super::*;

    /// Sign-up body.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserRequest {
        pub name: String,
        pub gender: Option<String>,
        pub term_agreement: Vec<i64>,
        pub birth: Option<i32>,
    }

    impl UserRequest {
        /// Builds the request from raw form input.
        ///
        /// An empty gender and a negative birth year mean "not provided".
        pub fn from_input(name: &str, gender: &str, birth: i32, term_agreement: Vec<i64>) -> Self {
            Self {
                name: name.to_string(),
                gender: (!gender.is_empty()).then(|| gender.to_string()),
                term_agreement,
                birth: (birth >= 0).then_some(birth),
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserResponse {
        pub id: i64,
        pub name: String,
        #[serde(default)]
        pub gender: Option<String>,
        #[serde(default)]
        pub birth: Option<i32>,
    }
}
