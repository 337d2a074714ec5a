use leptos::prelude::*;

#[component]
pub fn NotFound() -> impl IntoView {
    view! {
        <div id="content">
            <h1>"Not found"</h1>
            <a href="/">"Back to search"</a>
        </div>
    }
}
