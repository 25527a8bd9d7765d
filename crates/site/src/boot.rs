//! Startup sequence: resolve the mount point, construct the query cache, compose the providers,
//! render once.

use app_theme::Theme;
use leptos::{logging, IntoView, View};
use query_client::QueryClient;

use crate::{
    mount::{MountHost, MOUNT_ELEMENT_ID},
    web_app::SiteRoot,
};

/// Fatal startup failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootError {
    /// The page shell lacks the element the application renders into.
    #[error("mount element `#{id}` not found in document")]
    MissingMountElement {
        /// Id that was looked up.
        id: String,
    },
}

/// Page-lifetime values shared with the whole component tree.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// The single query cache for this startup.
    pub query_client: QueryClient,
    /// Theme value borrowed from the theme collaborator.
    pub theme: &'static Theme,
}

/// Composed root: query cache provider around theme provider around the application.
#[derive(Debug, Clone)]
pub struct ProviderTree {
    context: AppContext,
}

impl ProviderTree {
    /// Composes the tree around `context`.
    pub fn new(context: AppContext) -> Self {
        Self { context }
    }

    /// Values threaded into the providers.
    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Builds the Leptos view for the tree.
    pub fn into_view(self) -> View {
        let context = self.context;
        leptos::view! { <SiteRoot context=context /> }.into_view()
    }
}

/// Looks up the mount element.
///
/// # Errors
///
/// Returns [`BootError::MissingMountElement`] when `host` has no element with `id`.
pub fn resolve_mount_point<H: MountHost>(host: &H, id: &str) -> Result<H::Target, BootError> {
    host.find_mount_target(id)
        .ok_or_else(|| BootError::MissingMountElement { id: id.to_string() })
}

/// Runs the startup sequence with the default query cache and the built-in theme.
///
/// # Errors
///
/// Returns [`BootError::MissingMountElement`] before constructing anything when the mount
/// element is absent.
pub fn start<H: MountHost>(host: &H) -> Result<(), BootError> {
    start_with(host, QueryClient::new, app_theme::theme())
}

/// Runs the startup sequence with explicit collaborators.
///
/// `make_client` runs exactly once, after the mount point resolved. Each call builds an
/// independent cache and issues its own render.
///
/// # Errors
///
/// Returns [`BootError::MissingMountElement`] when the mount element is absent; nothing is
/// constructed or rendered in that case.
pub fn start_with<H, F>(host: &H, make_client: F, theme: &'static Theme) -> Result<(), BootError>
where
    H: MountHost,
    F: FnOnce() -> QueryClient,
{
    let target = resolve_mount_point(host, MOUNT_ELEMENT_ID)?;
    let context = AppContext {
        query_client: make_client(),
        theme,
    };
    logging::log!(
        "mounting into #{MOUNT_ELEMENT_ID} with query client {}",
        context.query_client.id()
    );
    host.render(target, ProviderTree::new(context));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use pretty_assertions::assert_eq;

    use super::*;

    struct RecordingHost {
        elements: Vec<&'static str>,
        renders: RefCell<Vec<(String, ProviderTree)>>,
    }

    impl RecordingHost {
        fn with_elements(elements: &[&'static str]) -> Self {
            Self {
                elements: elements.to_vec(),
                renders: RefCell::new(Vec::new()),
            }
        }
    }

    impl MountHost for RecordingHost {
        type Target = String;

        fn find_mount_target(&self, id: &str) -> Option<String> {
            self.elements
                .iter()
                .find(|element| **element == id)
                .map(|element| element.to_string())
        }

        fn render(&self, target: String, tree: ProviderTree) {
            self.renders.borrow_mut().push((target, tree));
        }
    }

    #[test]
    fn renders_once_into_root() {
        let host = RecordingHost::with_elements(&["header", MOUNT_ELEMENT_ID]);

        start(&host).expect("start");

        let renders = host.renders.borrow();
        assert_eq!(renders.len(), 1);
        let (target, _tree) = &renders[0];
        assert_eq!(target, "root");
    }

    #[test]
    fn missing_root_fails_before_any_render_or_construction() {
        let host = RecordingHost::with_elements(&["app"]);
        let constructed = Cell::new(0);

        let err = start_with(
            &host,
            || {
                constructed.set(constructed.get() + 1);
                QueryClient::new()
            },
            app_theme::theme(),
        )
        .expect_err("missing root");

        assert_eq!(
            err,
            BootError::MissingMountElement {
                id: "root".to_string()
            }
        );
        assert_eq!(err.to_string(), "mount element `#root` not found in document");
        assert!(host.renders.borrow().is_empty());
        assert_eq!(constructed.get(), 0);
    }

    #[test]
    fn client_constructor_runs_exactly_once() {
        let host = RecordingHost::with_elements(&[MOUNT_ELEMENT_ID]);
        let constructed = Cell::new(0);

        start_with(
            &host,
            || {
                constructed.set(constructed.get() + 1);
                QueryClient::new()
            },
            app_theme::theme(),
        )
        .expect("start");

        assert_eq!(constructed.get(), 1);
    }

    #[test]
    fn theme_is_passed_by_reference() {
        let host = RecordingHost::with_elements(&[MOUNT_ELEMENT_ID]);

        start(&host).expect("start");

        let renders = host.renders.borrow();
        assert!(std::ptr::eq(renders[0].1.context().theme, app_theme::theme()));
        assert!(std::ptr::eq(
            renders[0].1.context().theme,
            &app_theme::DEFAULT_THEME
        ));
    }

    #[test]
    fn fresh_client_has_no_pending_work() {
        let host = RecordingHost::with_elements(&[MOUNT_ELEMENT_ID]);

        start(&host).expect("start");

        let renders = host.renders.borrow();
        let client = &renders[0].1.context().query_client;
        assert!(client.is_empty());
        assert_eq!(client.is_fetching(), 0);
        assert_eq!(client.subscription_count(), 0);
        assert_eq!(client.config(), query_client::QueryClientConfig::default());
    }

    #[test]
    fn second_start_builds_an_independent_client() {
        let host = RecordingHost::with_elements(&[MOUNT_ELEMENT_ID]);

        start(&host).expect("first start");
        start(&host).expect("second start");

        let renders = host.renders.borrow();
        assert_eq!(renders.len(), 2);
        let first = &renders[0].1.context().query_client;
        let second = &renders[1].1.context().query_client;
        assert!(!first.ptr_eq(second));
        assert_ne!(first.id(), second.id());

        first.set_query_data(&query_client::QueryKey::from("todos"), 1u8);
        assert!(second.is_empty());
    }
}
