use dioxus::prelude::*;

use oldgold_common::draft::ListingDraft;
use oldgold_common::listing::{Category, Condition, MAX_IMAGES};

/// Create/edit form. The parent owns the draft and performs the submit.
#[component]
pub fn ListingForm(
    mut draft: Signal<ListingDraft>,
    pending: bool,
    #[props(!optional)] error: Option<String>,
    submit_label: String,
    on_submit: EventHandler<()>,
) -> Element {
    let current = draft.read().clone();
    let previews = current.images();

    rsx! {
        form {
            class: "listing-form",
            onsubmit: move |evt| {
                evt.prevent_default();
                on_submit.call(());
            },
            div { class: "form-group",
                label { "Title" }
                input {
                    r#type: "text",
                    placeholder: "What are you selling?",
                    value: "{current.title}",
                    oninput: move |evt| draft.write().title = evt.value(),
                }
            }
            div { class: "form-group",
                label { "Description" }
                textarea {
                    rows: "4",
                    value: "{current.description}",
                    oninput: move |evt| draft.write().description = evt.value(),
                }
            }
            div { class: "form-row",
                div { class: "form-group",
                    label { "Price (₹)" }
                    input {
                        r#type: "number",
                        min: "1",
                        placeholder: "₹",
                        value: "{current.price}",
                        oninput: move |evt| draft.write().price = evt.value(),
                    }
                }
                div { class: "form-group",
                    label { "Category" }
                    select {
                        value: "{current.category.label()}",
                        onchange: move |evt| {
                            if let Ok(category) = evt.value().parse::<Category>() {
                                draft.write().category = category;
                            }
                        },
                        for category in Category::all() {
                            option { value: "{category.label()}", "{category.label()}" }
                        }
                    }
                }
                div { class: "form-group",
                    label { "Condition" }
                    select {
                        value: "{current.condition.label()}",
                        onchange: move |evt| {
                            if let Ok(condition) = evt.value().parse::<Condition>() {
                                draft.write().condition = condition;
                            }
                        },
                        for condition in Condition::all() {
                            option { value: "{condition.label()}", "{condition.label()}" }
                        }
                    }
                }
            }
            div { class: "form-group",
                label { "City / Location" }
                input {
                    r#type: "text",
                    value: "{current.location}",
                    oninput: move |evt| draft.write().location = evt.value(),
                }
            }
            div { class: "form-group",
                label { "Image URLs (comma or new line, up to {MAX_IMAGES})" }
                textarea {
                    rows: "3",
                    placeholder: "https://…",
                    value: "{current.image_urls}",
                    oninput: move |evt| draft.write().image_urls = evt.value(),
                }
                if !previews.is_empty() {
                    div { class: "image-previews",
                        for url in previews {
                            div { key: "{url}", class: "preview",
                                img { src: "{url}", alt: "preview" }
                                button {
                                    r#type: "button",
                                    class: "remove-preview",
                                    title: "Remove",
                                    onclick: {
                                        let url = url.clone();
                                        move |_| draft.write().remove_image(&url)
                                    },
                                    "×"
                                }
                            }
                        }
                    }
                }
            }
            div { class: "form-row",
                div { class: "form-group",
                    label { "Seller name" }
                    input {
                        r#type: "text",
                        placeholder: "Defaults to your profile name",
                        value: "{current.seller_name}",
                        oninput: move |evt| draft.write().seller_name = evt.value(),
                    }
                }
                div { class: "form-group",
                    label { "WhatsApp number" }
                    input {
                        r#type: "tel",
                        placeholder: "10–13 digits",
                        value: "{current.seller_contact}",
                        oninput: move |evt| draft.write().seller_contact = evt.value(),
                    }
                }
            }
            if let Some(err) = error {
                div { class: "field-error", "{err}" }
            }
            button { r#type: "submit", disabled: pending, "{submit_label}" }
        }
    }
}
