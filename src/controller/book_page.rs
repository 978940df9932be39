//! Book page tab switching and club additions

use crate::gateway::BookClubApi;
use crate::model::{BookPage, BookTab, RequestToken};
use super::AppController;

/// A pane fetch started by activating a data tab
#[derive(Clone, Debug)]
pub(crate) struct TabLoad {
    book_id: String,
    tab: BookTab,
    token: RequestToken,
}

impl<G: BookClubApi> AppController<G> {
    /// Switch tabs now. The returned load, if any, fetches the new pane.
    pub(crate) async fn select_tab(&self, tab: BookTab) -> Option<TabLoad> {
        let mut book_page = self.model.book_page.lock().await;
        activate_on(book_page.as_mut()?, tab)
    }

    pub(crate) async fn step_tab(&self, forward: bool) -> Option<TabLoad> {
        let mut book_page = self.model.book_page.lock().await;
        let page = book_page.as_mut()?;
        let current = page.active_tab();
        activate_on(page, if forward { current.next() } else { current.prev() })
    }

    pub(crate) async fn load_tab(&self, load: TabLoad) {
        let TabLoad { book_id, tab, token } = load;
        tracing::debug!(book_id = %book_id, tab = tab.title(), "Loading tab");
        if tab == BookTab::Clubs {
            let result = self.gateway.book_clubs(&book_id).await;
            self.with_book_page(&book_id, |page| page.apply_clubs(token, result))
                .await;
        } else {
            let result = self.gateway.book_comments(&book_id).await;
            self.with_book_page(&book_id, |page| page.apply_comments(token, result))
                .await;
        }
    }

    /// The open book and the club choice highlighted right now.
    pub(crate) async fn selected_club_choice(&self) -> Option<(String, String)> {
        let book_page = self.model.book_page.lock().await;
        let page = book_page.as_ref()?;
        Some((page.book().id.clone(), page.selected_choice()?))
    }

    pub(crate) async fn add_to_club(&self, book_id: String, club: String) {
        match self.gateway.add_book_to_club(&book_id, &club).await {
            Ok(()) => {
                tracing::info!(book_id = %book_id, club = %club, "Book added to club");
                self.with_book_page(&book_id, |page| page.club_added(&club))
                    .await;
            }
            Err(e) => {
                tracing::warn!(error = %e, club = %club, "Failed to add book to club");
                self.model.set_error(e.user_message().to_string()).await;
            }
        }
    }
}

fn activate_on(page: &mut BookPage, tab: BookTab) -> Option<TabLoad> {
    let token = page.activate(tab)?;
    Some(TabLoad {
        book_id: page.book().id.clone(),
        tab,
        token,
    })
}

#[cfg(test)]
mod tests {
    use crate::controller::AppController;
    use crate::gateway::fake::FakeGateway;
    use crate::gateway::GatewayError;
    use crate::model::{AppModel, Book, BookPage, BookTab, ClubChoices, Comment, NO_COMMENTS, Session};

    impl AppController<FakeGateway> {
        async fn activate_tab(&self, tab: BookTab) {
            if let Some(load) = self.select_tab(tab).await {
                self.load_tab(load).await;
            }
        }

        async fn cycle_tab(&self, forward: bool) {
            if let Some(load) = self.step_tab(forward).await {
                self.load_tab(load).await;
            }
        }

        async fn add_selected_club(&self) {
            if let Some((book_id, club)) = self.selected_club_choice().await {
                self.add_to_club(book_id, club).await;
            }
        }
    }

    async fn controller_on_page() -> (AppController<FakeGateway>, FakeGateway) {
        let gateway = FakeGateway::new();
        let controller = AppController::new(AppModel::new(Session::default()), gateway.clone(), 20);
        *controller.model.book_page.lock().await = Some(BookPage::new(Book {
            id: "vol1".into(),
            ..Default::default()
        }));
        (controller, gateway)
    }

    #[tokio::test]
    async fn static_tabs_do_not_fetch() {
        let (controller, gateway) = controller_on_page().await;
        controller.activate_tab(BookTab::Statistics).await;
        controller.activate_tab(BookTab::AddComment).await;
        controller.activate_tab(BookTab::Description).await;
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn comments_tab_fetches_every_time() {
        let (controller, gateway) = controller_on_page().await;
        gateway.script(|s| {
            s.comments = Some(Ok(vec![Comment {
                comment: Some("Great".into()),
                ..Default::default()
            }]))
        });

        controller.activate_tab(BookTab::Comments).await;
        controller.activate_tab(BookTab::Description).await;
        controller.activate_tab(BookTab::Comments).await;

        assert_eq!(gateway.calls(), ["book_comments:vol1", "book_comments:vol1"]);
        let page = controller.model.book_page.lock().await;
        let page = page.as_ref().unwrap();
        assert!(page.is_active(BookTab::Comments));
        assert_eq!(page.comments().loaded().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_comments_show_literal_message() {
        let (controller, gateway) = controller_on_page().await;
        gateway.script(|s| {
            s.comments = Some(Err(GatewayError::Status {
                status: 400,
                path: "/comments/vol1".into(),
            }))
        });

        controller.activate_tab(BookTab::Comments).await;

        let page = controller.model.book_page.lock().await;
        assert_eq!(page.as_ref().unwrap().comments().error(), Some(NO_COMMENTS));
    }

    #[tokio::test]
    async fn adding_to_a_club_moves_it_to_included() {
        let (controller, gateway) = controller_on_page().await;
        gateway.script(|s| {
            s.clubs = Some(Ok(ClubChoices {
                included: vec![],
                choices: vec!["Sci-Fi".into()],
            }));
            s.add_book_to_club = Some(Ok(()));
        });

        controller.activate_tab(BookTab::Clubs).await;
        controller.add_selected_club().await;

        assert_eq!(gateway.calls().last().unwrap(), "add_book_to_club:vol1:Sci-Fi");
        let page = controller.model.book_page.lock().await;
        let clubs = page.as_ref().unwrap().clubs().loaded().unwrap().clone();
        assert_eq!(clubs.included, ["Sci-Fi"]);
        assert!(clubs.choices.is_empty());
    }

    #[tokio::test]
    async fn empty_club_selection_does_nothing() {
        let (controller, gateway) = controller_on_page().await;
        gateway.script(|s| s.clubs = Some(Ok(ClubChoices::default())));

        controller.activate_tab(BookTab::Clubs).await;
        controller.add_selected_club().await;

        assert_eq!(gateway.calls(), ["book_clubs:vol1"]);
    }

    #[tokio::test]
    async fn tabs_cycle_in_order() {
        let (controller, _gateway) = controller_on_page().await;
        controller.cycle_tab(false).await;
        let active = controller.model.book_page.lock().await.as_ref().unwrap().active_tab();
        assert_eq!(active, BookTab::Clubs);
    }
}
