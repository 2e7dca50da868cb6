//! Typed endpoints of the envelope backend.
use api_types::{
    category::CategoryConfig,
    friend::{FriendIdResponse, FriendRequest},
    envelope::{
        CreateEnvelopeResponse, EnvelopeDetailResponse, EnvelopeRequest, EnvelopesListQuery,
        EnvelopesListResponse, RelationshipListResponse, SearchEnvelopeQuery,
        SearchEnvelopeResponse,
    },
    user::{UserRequest, UserResponse},
    vote::PopularVote,
};

use crate::{client::ApiClient, pager::EnvelopePager, result::ApiResult};

#[derive(Clone, Debug)]
pub struct EnvelopesService {
    client: ApiClient,
}

impl EnvelopesService {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Per-friend totals of sent and received envelopes.
    pub async fn friend_statistics(
        &self,
        query: &EnvelopesListQuery,
    ) -> ApiResult<EnvelopesListResponse> {
        self.client
            .get("envelopes/friend-statistics", &query.query_pairs())
            .await
    }

    /// Relationships offered when creating an envelope.
    pub async fn relationship_configs(&self) -> ApiResult<RelationshipListResponse> {
        self.client.get("envelopes/configs/create-envelopes", &[]).await
    }

    pub async fn categories(&self) -> ApiResult<Vec<CategoryConfig>> {
        self.client.get("envelopes/configs/categories", &[]).await
    }

    pub async fn create(&self, request: &EnvelopeRequest) -> ApiResult<CreateEnvelopeResponse> {
        self.client.post("envelopes", request).await
    }

    pub async fn search(&self, query: &SearchEnvelopeQuery) -> ApiResult<SearchEnvelopeResponse> {
        self.client.get("envelopes", &query.query_pairs()).await
    }

    pub async fn detail(&self, id: i64) -> ApiResult<EnvelopeDetailResponse> {
        self.client.get(&format!("envelopes/{id}"), &[]).await
    }

    pub async fn edit(
        &self,
        id: i64,
        request: &EnvelopeRequest,
    ) -> ApiResult<CreateEnvelopeResponse> {
        self.client.patch(&format!("envelopes/{id}"), request).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete(&format!("envelopes/{id}")).await
    }

    /// Pages through [`search`](Self::search) results; `query.page` is the
    /// first page to load.
    pub fn pager(&self, query: SearchEnvelopeQuery) -> EnvelopePager {
        EnvelopePager::new(self.clone(), query)
    }
}

#[derive(Clone, Debug)]
pub struct FriendsService {
    client: ApiClient,
}

impl FriendsService {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Renames a friend or changes how they are related to the user.
    pub async fn edit(&self, id: i64, request: &FriendRequest) -> ApiResult<FriendIdResponse> {
        self.client.patch(&format!("friends/{id}"), request).await
    }
}

#[derive(Clone, Debug)]
pub struct UsersService {
    client: ApiClient,
}

impl UsersService {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn sign_up(&self, request: &UserRequest) -> ApiResult<UserResponse> {
        self.client.post("users", request).await
    }

    pub async fn me(&self) -> ApiResult<UserResponse> {
        self.client.get("users/my-info", &[]).await
    }

    pub async fn withdraw(&self) -> ApiResult<()> {
        self.client.delete("users/me").await
    }
}

#[derive(Clone, Debug)]
pub struct VotesService {
    client: ApiClient,
}

impl VotesService {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn popular(&self, size: Option<u32>) -> ApiResult<Vec<PopularVote>> {
        let query: Vec<(&'static str, String)> =
            size.map(|size| ("size", size.to_string())).into_iter().collect();
        self.client.get("votes/popular", &query).await
    }
}
