use crate::components::search_box::SearchBox;
use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div id="content" class="start-page">
            <h1>"Best Search Engine Ever"</h1>
            <SearchBox/>
        </div>
    }
}
