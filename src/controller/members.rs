//! Club membership: user lookup, adding and removing members

use crate::gateway::BookClubApi;
use crate::model::RequestToken;
use super::AppController;

/// A membership change captured when the user asked for it
#[derive(Clone, Debug)]
pub(crate) struct MemberChange {
    club_id: i64,
    username: String,
    add: bool,
}

impl<G: BookClubApi> AppController<G> {
    /// Start an autocomplete lookup for the typed member query.
    pub(crate) async fn begin_user_lookup(&self) -> Option<(i64, RequestToken, String)> {
        let mut club_page = self.model.club_page.lock().await;
        let page = club_page.as_mut()?;
        let (token, query) = page.begin_user_search()?;
        Some((page.club_id(), token, query))
    }

    pub(crate) async fn lookup_users(&self, (club_id, token, query): (i64, RequestToken, String)) {
        let result = self.gateway.search_users(&query).await;
        self.with_club_page(club_id, |page| page.apply_suggestions(token, result))
            .await;
    }

    pub(crate) async fn prepare_member_change(&self, add: bool) -> Option<MemberChange> {
        let club_page = self.model.club_page.lock().await;
        let page = club_page.as_ref()?;
        Some(MemberChange {
            club_id: page.club_id(),
            username: page.member_username()?,
            add,
        })
    }

    pub(crate) async fn change_membership(&self, change: MemberChange) {
        let MemberChange { club_id, username, add } = change;
        if add {
            tracing::info!(club_id, username = %username, "Adding club member");
            let result = self.gateway.add_member(club_id, &username).await;
            self.with_club_page(club_id, |page| page.member_added(&username, result))
                .await;
        } else {
            tracing::info!(club_id, username = %username, "Removing club member");
            let result = self.gateway.remove_member(club_id, &username).await;
            self.with_club_page(club_id, |page| page.member_removed(&username, result))
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::controller::AppController;
    use crate::gateway::fake::FakeGateway;
    use crate::gateway::GatewayError;
    use crate::model::{AppModel, ClubPage, Member, Session};

    impl AppController<FakeGateway> {
        async fn update_user_suggestions(&self) {
            if let Some(lookup) = self.begin_user_lookup().await {
                self.lookup_users(lookup).await;
            }
        }

        async fn add_member(&self) {
            if let Some(change) = self.prepare_member_change(true).await {
                self.change_membership(change).await;
            }
        }

        async fn remove_member(&self) {
            if let Some(change) = self.prepare_member_change(false).await {
                self.change_membership(change).await;
            }
        }
    }

    async fn controller_on_club() -> (AppController<FakeGateway>, FakeGateway) {
        let gateway = FakeGateway::new();
        let controller = AppController::new(AppModel::new(Session::default()), gateway.clone(), 20);
        *controller.model.club_page.lock().await = Some(ClubPage::new(3, 20));
        (controller, gateway)
    }

    async fn type_member(controller: &AppController<FakeGateway>, text: &str) {
        controller
            .with_club_page(3, |page| text.chars().for_each(|c| page.push_member_query(c)))
            .await;
    }

    #[tokio::test]
    async fn suggestion_picks_username_for_add() {
        let (controller, gateway) = controller_on_club().await;
        gateway.script(|s| {
            s.users = Some(Ok(vec!["Ana Lee - ana".into(), "Anabel Cruz - abc".into()]));
            s.add_member = Some(Ok(Member {
                first_name: "Anabel".into(),
                last_name: "Cruz".into(),
            }));
        });
        type_member(&controller, "an").await;

        controller.update_user_suggestions().await;
        controller.with_club_page(3, |page| page.select_suggestion(1)).await;
        controller.add_member().await;

        assert_eq!(gateway.calls(), ["search_users:an", "add_member:3:abc"]);
        let log = controller
            .with_club_page(3, |page| page.membership_log().to_vec())
            .await
            .unwrap();
        assert_eq!(log, ["Added Anabel Cruz"]);
    }

    #[tokio::test]
    async fn blank_query_does_not_search() {
        let (controller, gateway) = controller_on_club().await;
        controller.update_user_suggestions().await;
        controller.add_member().await;
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_removal_becomes_notice() {
        let (controller, gateway) = controller_on_club().await;
        gateway.script(|s| s.remove_member = Some(Err(GatewayError::Transport("reset".into()))));
        type_member(&controller, "bo").await;

        controller.remove_member().await;

        assert_eq!(gateway.calls(), ["remove_member:3:bo"]);
        let notices = controller
            .with_club_page(3, |page| page.notices().to_vec())
            .await
            .unwrap();
        assert_eq!(notices, ["Error - Failed to remove bo"]);
    }

    #[tokio::test]
    async fn failed_lookup_leaves_no_suggestions() {
        let (controller, gateway) = controller_on_club().await;
        gateway.script(|s| s.users = Some(Err(GatewayError::Transport("reset".into()))));
        type_member(&controller, "zz").await;

        controller.update_user_suggestions().await;

        let suggestions = controller
            .with_club_page(3, |page| page.suggestions().len())
            .await;
        assert_eq!(suggestions, Some(0));
    }
}
