use crate::api;
use gloo_timers::future::TimeoutFuture;
use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use web_sys::KeyboardEvent;

/// Navigation target for a chosen suggestion or a submitted query.
pub(crate) fn results_href(query: &str) -> String {
    format!("/search-results?q={}", api::encode_query(query))
}

/// Guard for overlapping suggestion requests: requests are numbered
/// when they are sent, and a response only applies if nothing newer
/// has been applied already. A slow stale response can therefore
/// never overwrite the suggestions of a later keystroke.
pub(crate) fn should_apply(serial: u64, last_applied: u64) -> bool {
    serial > last_applied
}

/// Search input with a live suggestion dropdown. Every input or
/// focus event refetches `/search-suggestions` for the current text;
/// there is no debounce and no minimum query length. Failed fetches
/// are logged and leave the rendered list untouched.
#[component]
pub fn SearchBox(#[prop(optional)] initial: String) -> impl IntoView {
    let text_input = NodeRef::<Input>::new();
    let (search, set_search) = signal(initial);
    let (suggestions, set_suggestions) = signal(Vec::<String>::new());
    let (active, set_active) = signal(false);
    let navigate = use_navigate();

    let request_serial = StoredValue::new(0u64);
    let applied_serial = StoredValue::new(0u64);

    let update_list = move || {
        let query = search.get_untracked();
        request_serial.update_value(|serial| *serial += 1);
        let serial = request_serial.get_value();
        spawn_local(async move {
            match api::fetch_suggestions(&query).await {
                Ok(items) => {
                    if should_apply(serial, applied_serial.get_value()) {
                        applied_serial.set_value(serial);
                        set_suggestions.set(items);
                    }
                }
                Err(e) => log::error!("suggestion fetch failed: {e}"),
            }
        });
    };

    let on_input = move |ev| {
        set_search.set(event_target_value(&ev));
        update_list();
    };
    let focus_in = move |_| {
        set_active.set(true);
        update_list();
    };
    let focus_out = move |_| {
        spawn_local(async move {
            // let a click on a suggestion land before the dropdown hides
            TimeoutFuture::new(250).await;
            set_active.set(false);
        })
    };

    let navigate_keydown = navigate.clone();
    let keydown = move |e: KeyboardEvent| {
        let key = e.key();
        if key == "Escape" {
            set_search.set(String::new());
            if let Some(input) = text_input.get() {
                let _ = input.blur();
            }
        } else if key == "Enter" {
            e.prevent_default();
            navigate_keydown(
                &results_href(&search.get_untracked()),
                NavigateOptions::default(),
            );
        }
    };

    let navigate_submit = navigate.clone();
    let navigate_item = navigate;
    view! {
        <div id="search">
            <input
                node_ref=text_input
                id="search-input"
                type="text"
                autocomplete="off"
                placeholder="Enter your search"
                prop:value=search
                on:input=on_input
                on:focusin=focus_in
                on:focusout=focus_out
                on:keydown=keydown
            />
            <button on:click=move |_| {
                navigate_submit(
                    &results_href(&search.get_untracked()),
                    NavigateOptions::default(),
                );
            }>"Search"</button>
            <div id="search-suggestions" class:hidden=move || !active.get()>
                <ul id="search-suggestions-list">
                    <For
                        each=move || {
                            suggestions.get().into_iter().enumerate().collect::<Vec<_>>()
                        }
                        key=|(index, suggestion)| (*index, suggestion.clone())
                        children=move |(_, suggestion)| {
                            let href = results_href(&suggestion);
                            let navigate = navigate_item.clone();
                            view! {
                                <li on:click=move |_| {
                                    navigate(&href, NavigateOptions::default());
                                }>{suggestion}</li>
                            }
                        }
                    />
                </ul>
            </div>
        </div>
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clicking_suggestion_t_navigates_to_results_for_t() {
        assert_eq!(results_href("T"), "/search-results?q=T");
        assert_eq!(results_href("a b"), "/search-results?q=a%20b");
    }

    #[test]
    fn stale_responses_are_discarded() {
        // request 1 sent, then request 2; 2 resolves first
        assert!(should_apply(2, 0));
        // 1 arrives late and must not overwrite 2
        assert!(!should_apply(1, 2));
        // a genuinely newer response still applies
        assert!(should_apply(3, 2));
    }

    #[test]
    fn reapplying_the_same_serial_is_rejected() {
        assert!(!should_apply(2, 2));
    }
}
