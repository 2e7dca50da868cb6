use chrono::NaiveDateTime;
use clap::{Args, Subcommand};
use susu_client::{
    ApiClient, ApiResult, Failure,
    types::{
        EnvelopeType,
        envelope::{
            CategoryRequest, EnvelopeRequest, EnvelopeSearchItem, EnvelopesListQuery,
            SearchEnvelopeQuery,
        },
        friend::FriendRequest,
        user::UserRequest,
    },
};

use crate::{config::AppConfig, error::Result};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sent and received envelopes.
    Envelopes(Envelopes),
    /// Relationships offered when recording an envelope.
    Relationships,
    /// Event categories offered when recording an envelope.
    Categories,
    /// Community votes.
    Votes(Votes),
    /// Account management.
    User(User),
}

#[derive(Args, Debug)]
pub struct Envelopes {
    #[command(subcommand)]
    command: EnvelopesCommand,
}

#[derive(Subcommand, Debug)]
enum EnvelopesCommand {
    /// Totals per friend.
    Stats(StatsArgs),
    Search(SearchArgs),
    Show { id: i64 },
    Create(CreateArgs),
    /// Updates a sent envelope together with its friend.
    Edit(EditArgs),
    Delete { id: i64 },
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[arg(long = "friend-id")]
    friend_ids: Vec<i64>,
    #[arg(long)]
    from_total_amounts: Option<i64>,
    #[arg(long)]
    to_total_amounts: Option<i64>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    size: Option<u32>,
    #[arg(long)]
    sort: Option<String>,
}

#[derive(Args, Debug)]
struct SearchArgs {
    #[arg(long = "friend-id")]
    friend_ids: Vec<i64>,
    #[arg(long)]
    ledger_id: Option<i64>,
    /// SENT or RECEIVED; repeat for both.
    #[arg(long = "type")]
    types: Vec<EnvelopeType>,
    #[arg(long)]
    from_amount: Option<i64>,
    #[arg(long)]
    to_amount: Option<i64>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    size: Option<u32>,
    #[arg(long)]
    sort: Option<String>,
    /// Keep loading pages until the last one.
    #[arg(long)]
    all: bool,
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[arg(long = "type")]
    kind: EnvelopeType,
    #[arg(long)]
    friend_id: i64,
    #[arg(long)]
    ledger_id: Option<i64>,
    #[arg(long)]
    amount: i64,
    /// Local date and time, e.g. 2024-03-01T12:00:00.
    #[arg(long)]
    handed_over_at: NaiveDateTime,
    #[arg(long)]
    gift: Option<String>,
    #[arg(long)]
    memo: Option<String>,
    #[arg(long)]
    visited: Option<bool>,
    #[arg(long)]
    category_id: Option<i64>,
    #[arg(long, requires = "category_id")]
    custom_category: Option<String>,
}

impl From<CreateArgs> for EnvelopeRequest {
    fn from(args: CreateArgs) -> Self {
        Self {
            kind: args.kind,
            friend_id: args.friend_id,
            ledger_id: args.ledger_id,
            amount: args.amount,
            gift: args.gift,
            memo: args.memo,
            has_visited: args.visited,
            handed_over_at: args.handed_over_at,
            category: args.category_id.map(|id| CategoryRequest {
                id,
                custom_category: args.custom_category,
            }),
        }
    }
}

#[derive(Args, Debug)]
struct EditArgs {
    id: i64,
    #[arg(long)]
    friend_id: i64,
    #[arg(long)]
    friend_name: String,
    #[arg(long)]
    phone_number: Option<String>,
    #[arg(long)]
    relationship_id: i64,
    #[arg(long)]
    custom_relation: Option<String>,
    #[arg(long)]
    amount: i64,
    #[arg(long)]
    handed_over_at: NaiveDateTime,
    #[arg(long)]
    gift: Option<String>,
    #[arg(long)]
    memo: Option<String>,
    #[arg(long)]
    visited: Option<bool>,
    #[arg(long)]
    category_id: i64,
    #[arg(long)]
    custom_category: Option<String>,
}

impl EditArgs {
    fn friend_request(&self) -> FriendRequest {
        FriendRequest {
            name: self.friend_name.clone(),
            phone_number: self.phone_number.clone(),
            relationship_id: self.relationship_id,
            custom_relation: self.custom_relation.clone(),
        }
    }

    /// Only sent envelopes are edited here.
    fn envelope_request(self) -> EnvelopeRequest {
        EnvelopeRequest {
            kind: EnvelopeType::Sent,
            friend_id: self.friend_id,
            ledger_id: None,
            amount: self.amount,
            gift: self.gift,
            memo: self.memo,
            has_visited: self.visited,
            handed_over_at: self.handed_over_at,
            category: Some(CategoryRequest {
                id: self.category_id,
                custom_category: self.custom_category,
            }),
        }
    }
}

#[derive(Args, Debug)]
struct SignUpArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    gender: String,
    /// Birth year; negative when not given.
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    birth: i32,
    /// Ids of the accepted terms; repeat for each.
    #[arg(long = "term-agreement")]
    term_agreement: Vec<i64>,
}

impl From<SignUpArgs> for UserRequest {
    fn from(args: SignUpArgs) -> Self {
        UserRequest::from_input(&args.name, &args.gender, args.birth, args.term_agreement)
    }
}

#[derive(Args, Debug)]
pub struct Votes {
    #[command(subcommand)]
    command: VotesCommand,
}

#[derive(Subcommand, Debug)]
enum VotesCommand {
    Popular {
        #[arg(long)]
        size: Option<u32>,
    },
}

#[derive(Args, Debug)]
pub struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    SignUp(SignUpArgs),
    Me,
    /// Deletes the account on the server.
    Withdraw,
}

/// Logs the raw failure before it is classified for the caller.
fn log_failure(failure: &Failure) {
    match failure {
        Failure::HttpError { code, message, body } => {
            tracing::warn!(code, %message, "request failed");
            tracing::debug!("error body: {body}");
        }
        Failure::NetworkError(cause) => tracing::warn!("network error: {cause}"),
        Failure::UnknownApiError(cause) => tracing::warn!("unexpected error: {cause}"),
    }
}

fn checked<T>(result: ApiResult<T>) -> Result<T> {
    Ok(result.on_failure(log_failure).get_or_throw()?)
}

pub async fn run(command: Command, config: &AppConfig) -> Result<()> {
    let client = ApiClient::builder()
        .base_url(&config.base_url)
        .access_token(config.access_token.as_deref())
        .timeout(config.timeout())
        .build()?;

    match command {
        Command::Envelopes(envelopes) => run_envelopes(&client, envelopes.command).await,
        Command::Relationships => {
            let list = checked(client.envelopes().relationship_configs().await)?;
            for relationship in list.relationships {
                println!("{:>4}  {}", relationship.id, relationship.relation);
            }
            Ok(())
        }
        Command::Categories => {
            let mut categories = checked(client.envelopes().categories().await)?;
            categories.sort_by_key(|category| category.seq);
            for category in categories {
                println!("{:>4}  {}", category.id, category.name);
            }
            Ok(())
        }
        Command::Votes(votes) => match votes.command {
            VotesCommand::Popular { size } => {
                for vote in checked(client.votes().popular(size).await)? {
                    println!("{:>4}  [{}] {} votes", vote.id, vote.category, vote.count);
                }
                Ok(())
            }
        },
        Command::User(user) => match user.command {
            UserCommand::SignUp(args) => {
                let user = checked(client.users().sign_up(&args.into()).await)?;
                tracing::info!(id = user.id, "signed up");
                println!("Welcome, {} ({})", user.name, user.id);
                Ok(())
            }
            UserCommand::Me => {
                let me = checked(client.users().me().await)?;
                println!("{} ({})", me.name, me.id);
                Ok(())
            }
            UserCommand::Withdraw => {
                checked(client.users().withdraw().await)?;
                tracing::info!("account withdrawn");
                println!("Account deleted.");
                Ok(())
            }
        },
    }
}

async fn run_envelopes(client: &ApiClient, command: EnvelopesCommand) -> Result<()> {
    let envelopes = client.envelopes();
    match command {
        EnvelopesCommand::Stats(args) => {
            let query = EnvelopesListQuery {
                friend_ids: args.friend_ids,
                from_total_amounts: args.from_total_amounts,
                to_total_amounts: args.to_total_amounts,
                page: args.page,
                size: args.size,
                sort: args.sort,
            };
            let page = checked(envelopes.friend_statistics(&query).await)?;
            for row in &page.data {
                println!(
                    "{:<16} {:<10} sent {:>10} received {:>10} balance {:>+10}",
                    row.friend.name,
                    row.relationship.relation,
                    row.total_sent_amounts,
                    row.total_received_amounts,
                    row.balance()
                );
            }
            println!(
                "page {}/{} ({} friends)",
                page.page + 1,
                page.total_page.max(1),
                page.total_count
            );
            Ok(())
        }
        EnvelopesCommand::Search(args) => {
            let query = SearchEnvelopeQuery {
                friend_ids: args.friend_ids,
                ledger_id: args.ledger_id,
                types: args.types,
                from_amount: args.from_amount,
                to_amount: args.to_amount,
                page: args.page,
                size: args.size,
                sort: args.sort,
                ..Default::default()
            };
            if args.all {
                let pager = envelopes.pager(query);
                while !pager.is_finished().await {
                    for item in checked(pager.next_page().await)? {
                        print_item(&item);
                    }
                }
            } else {
                let page = checked(envelopes.search(&query).await)?;
                for item in &page.data {
                    print_item(item);
                }
                println!("page {}/{}", page.page + 1, page.total_page.max(1));
            }
            Ok(())
        }
        EnvelopesCommand::Show { id } => {
            let detail = checked(envelopes.detail(id).await)?;
            let envelope = &detail.envelope;
            println!("#{} {} {}", envelope.id, envelope.kind.as_str(), envelope.amount);
            println!("  friend:   {} ({})", detail.friend.name, detail.relationship.relation);
            println!(
                "  category: {}",
                detail
                    .category
                    .custom_category
                    .as_deref()
                    .unwrap_or(&detail.category.category)
            );
            println!("  date:     {}", envelope.handed_over_at);
            if let Some(gift) = &envelope.gift {
                println!("  gift:     {gift}");
            }
            if let Some(memo) = &envelope.memo {
                println!("  memo:     {memo}");
            }
            Ok(())
        }
        EnvelopesCommand::Create(args) => {
            let created = checked(envelopes.create(&args.into()).await)?;
            tracing::info!(id = created.id, "envelope created");
            println!("Created envelope #{}", created.id);
            Ok(())
        }
        EnvelopesCommand::Edit(args) => {
            let id = args.id;
            checked(
                client
                    .friends()
                    .edit(args.friend_id, &args.friend_request())
                    .await,
            )?;
            let edited = checked(envelopes.edit(id, &args.envelope_request()).await)?;
            tracing::info!(id = edited.id, "envelope edited");
            println!("Updated envelope #{}", edited.id);
            Ok(())
        }
        EnvelopesCommand::Delete { id } => {
            checked(envelopes.delete(id).await)?;
            println!("Deleted envelope #{id}");
            Ok(())
        }
    }
}

fn print_item(item: &EnvelopeSearchItem) {
    let friend = item
        .friend
        .as_ref()
        .map(|friend| friend.name.as_str())
        .unwrap_or("-");
    println!(
        "#{:<6} {:<8} {:>10}  {:<16} {}",
        item.envelope.id,
        item.envelope.kind.as_str(),
        item.envelope.amount,
        friend,
        item.envelope.handed_over_at.date()
    );
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    #[test]
    fn create_args_build_the_request() {
        let cli = TestCli::try_parse_from([
            "susu",
            "envelopes",
            "create",
            "--type",
            "RECEIVED",
            "--friend-id",
            "3",
            "--amount",
            "50000",
            "--handed-over-at",
            "2024-03-01T12:00:00",
            "--category-id",
            "5",
            "--custom-category",
            "Housewarming",
        ])
        .unwrap();

        let Command::Envelopes(Envelopes {
            command: EnvelopesCommand::Create(args),
        }) = cli.command
        else {
            panic!("expected envelopes create");
        };
        let request = EnvelopeRequest::from(args);
        assert_eq!(request.kind, EnvelopeType::Received);
        assert_eq!(request.amount, 50000);
        assert_eq!(
            request.category,
            Some(CategoryRequest {
                id: 5,
                custom_category: Some("Housewarming".to_string())
            })
        );
    }

    #[test]
    fn custom_category_needs_a_category() {
        let res = TestCli::try_parse_from([
            "susu",
            "envelopes",
            "create",
            "--type",
            "SENT",
            "--friend-id",
            "3",
            "--amount",
            "1",
            "--handed-over-at",
            "2024-03-01T12:00:00",
            "--custom-category",
            "x",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn search_accepts_repeated_filters() {
        let cli = TestCli::try_parse_from([
            "susu", "envelopes", "search", "--friend-id", "1", "--friend-id", "2", "--type",
            "sent", "--all",
        ])
        .unwrap();
        let Command::Envelopes(Envelopes {
            command: EnvelopesCommand::Search(args),
        }) = cli.command
        else {
            panic!("expected envelopes search");
        };
        assert_eq!(args.friend_ids, vec![1, 2]);
        assert_eq!(args.types, vec![EnvelopeType::Sent]);
        assert!(args.all);
    }

    #[test]
    fn edit_args_split_into_friend_and_envelope() {
        let cli = TestCli::try_parse_from([
            "susu",
            "envelopes",
            "edit",
            "5",
            "--friend-id",
            "3",
            "--friend-name",
            "Lee",
            "--relationship-id",
            "2",
            "--amount",
            "70000",
            "--handed-over-at",
            "2024-03-01T12:00:00",
            "--category-id",
            "1",
        ])
        .unwrap();
        let Command::Envelopes(Envelopes {
            command: EnvelopesCommand::Edit(args),
        }) = cli.command
        else {
            panic!("expected envelopes edit");
        };
        assert_eq!(args.id, 5);

        let friend = args.friend_request();
        assert_eq!(friend.name, "Lee");
        assert_eq!(friend.relationship_id, 2);

        let envelope = args.envelope_request();
        assert_eq!(envelope.kind, EnvelopeType::Sent);
        assert_eq!(envelope.friend_id, 3);
        assert_eq!(envelope.category.map(|category| category.id), Some(1));
    }

    #[test]
    fn sign_up_defaults_mean_not_provided() {
        let cli = TestCli::try_parse_from([
            "susu",
            "user",
            "sign-up",
            "--name",
            "Kim",
            "--term-agreement",
            "1",
            "--term-agreement",
            "2",
        ])
        .unwrap();
        let Command::User(User {
            command: UserCommand::SignUp(args),
        }) = cli.command
        else {
            panic!("expected user sign-up");
        };
        let request = UserRequest::from(args);
        assert_eq!(request.gender, None);
        assert_eq!(request.birth, None);
        assert_eq!(request.term_agreement, vec![1, 2]);
    }
}
