//! Mount-point lookup and the one-shot render seam.

use crate::boot::ProviderTree;

/// Id of the element the page shell provides for the application.
pub const MOUNT_ELEMENT_ID: &str = "root";

/// Host document operations used by the bootstrap.
///
/// The browser implementation is [`BrowserMountHost`]; tests substitute a recording fake.
pub trait MountHost {
    /// Handle to a resolved mount element.
    type Target;

    /// Looks up the element with `id` in the active document.
    fn find_mount_target(&self, id: &str) -> Option<Self::Target>;

    /// Renders `tree` into `target`.
    fn render(&self, target: Self::Target, tree: ProviderTree);
}

#[cfg(all(feature = "csr", target_arch = "wasm32"))]
pub use browser::BrowserMountHost;

#[cfg(all(feature = "csr", target_arch = "wasm32"))]
mod browser {
    use wasm_bindgen::JsCast;

    use super::MountHost;
    use crate::boot::ProviderTree;

    /// [`MountHost`] backed by `window.document`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct BrowserMountHost;

    impl MountHost for BrowserMountHost {
        type Target = web_sys::HtmlElement;

        fn find_mount_target(&self, id: &str) -> Option<Self::Target> {
            web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(id))
                .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok())
        }

        fn render(&self, target: Self::Target, tree: ProviderTree) {
            leptos::mount_to(target, move || tree.into_view());
        }
    }
}
