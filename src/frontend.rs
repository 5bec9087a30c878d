use std::rc::Rc;

use gloo_file::{File, FileList};
use leptos::*;
use leptos_meta::{provide_meta_context, Title};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, Event, SubmitEvent};

use crate::upload::UploadView;
use crate::validation::format_file_size;
use crate::{ClientConfig, FileRecord, Page, Portal, Role, ToastKind};

mod browser;
mod http;

pub use browser::{BrowserStore, ShownToast, SignalView};
pub use http::{load_config, HttpGateway};

pub type BrowserPortal = Portal<HttpGateway, BrowserStore, SignalView>;

#[component]
pub fn App(config: ClientConfig, verification_token: Option<String>) -> impl IntoView {
    provide_meta_context();

    let signals = SignalView::new();
    let debug_mode = config.debug_mode;
    let portal = store_value(Rc::new(Portal::new(
        HttpGateway::new(config),
        BrowserStore,
        signals,
    )));

    install_error_handler(portal.get_value());

    // Restore the stored session (or open the email verification link) on mount
    create_effect(move |_| {
        let token = verification_token.clone();
        let portal = portal.get_value();
        spawn_local(async move {
            portal.start(token).await;
        });
    });

    view! {
        <Title text="Document Portal"/>
        <StyleProvider />
        <NavBar portal=portal signals=signals />
        <main class="container">
            <LandingPage portal=portal signals=signals />
            <LoginPage portal=portal signals=signals />
            <SignupPage portal=portal signals=signals />
            <VerificationPage portal=portal signals=signals />
            <OpsDashboard portal=portal signals=signals debug_mode=debug_mode />
            <ClientDashboard portal=portal signals=signals />
        </main>
        <ToastView signals=signals />
        <div class="loading-overlay" class:show=move || signals.loading.get()>
            <div class="spinner"></div>
        </div>
    }
}

fn page_active(signals: SignalView, page: Page) -> impl Fn() -> bool {
    move || signals.page.get() == page
}

#[component]
fn NavBar(portal: StoredValue<Rc<BrowserPortal>>, signals: SignalView) -> impl IntoView {
    let logged_out_display = move || if signals.logged_in.get() { "none" } else { "block" };
    let logged_in_display = move || if signals.logged_in.get() { "block" } else { "none" };

    view! {
        <nav class="navbar">
            <div class="nav-brand" on:click=move |_| portal.get_value().show_landing()>
                <i class="fas fa-share-alt"></i>
                " Document Portal"
            </div>
            <div class="nav-actions">
                <button id="loginBtn" class="btn secondary" style:display=logged_out_display
                    on:click=move |_| portal.get_value().show_login()>
                    "Login"
                </button>
                <button id="signupBtn" class="btn primary" style:display=logged_out_display
                    on:click=move |_| portal.get_value().show_signup()>
                    "Sign Up"
                </button>
                <button id="logoutBtn" class="btn secondary" style:display=logged_in_display
                    on:click=move |_| portal.get_value().logout()>
                    "Logout"
                </button>
            </div>
        </nav>
    }
}

#[component]
fn LandingPage(portal: StoredValue<Rc<BrowserPortal>>, signals: SignalView) -> impl IntoView {
    view! {
        <section id=Page::Landing.id() class="page" class:active=page_active(signals, Page::Landing)>
            <div class="hero">
                <h1>"Secure office document sharing"</h1>
                <p>"Ops staff upload presentations, documents and spreadsheets. Clients download them with one-time links."</p>
                <div class="hero-actions">
                    <button class="btn primary" on:click=move |_| portal.get_value().show_login()>
                        "Login"
                    </button>
                    <button class="btn secondary" on:click=move |_| portal.get_value().show_signup()>
                        "Create client account"
                    </button>
                </div>
            </div>
        </section>
    }
}

#[component]
fn LoginPage(portal: StoredValue<Rc<BrowserPortal>>, signals: SignalView) -> impl IntoView {
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let portal = portal.get_value();
        let email = email.get_untracked();
        let password = password.get_untracked();
        spawn_local(async move {
            portal.login(&email, &password).await;
        });
    };

    view! {
        <section id=Page::Login.id() class="page" class:active=page_active(signals, Page::Login)>
            <div class="card auth-card">
                <h2>"Login"</h2>
                <div class="user-type-selector">
                    <button type="button" class="user-type-btn" data-type="client"
                        class:active=move || signals.role.get() == Role::Client
                        on:click=move |_| portal.get_value().select_role(Role::Client)>
                        "Client"
                    </button>
                    <button type="button" class="user-type-btn" data-type="ops"
                        class:active=move || signals.role.get() == Role::Ops
                        on:click=move |_| portal.get_value().select_role(Role::Ops)>
                        "Ops"
                    </button>
                </div>
                <form id="loginForm" on:submit=on_submit>
                    <label for="loginEmail">"Email"</label>
                    <input id="loginEmail" type="email" required
                        prop:value=move || email.get()
                        on:input=move |e| set_email.set(event_target_value(&e))
                    />
                    <label for="loginPassword">"Password"</label>
                    <input id="loginPassword" type="password" required
                        prop:value=move || password.get()
                        on:input=move |e| set_password.set(event_target_value(&e))
                    />
                    <button type="submit" class="btn primary full">"Login"</button>
                </form>
            </div>
        </section>
    }
}

#[component]
fn SignupPage(portal: StoredValue<Rc<BrowserPortal>>, signals: SignalView) -> impl IntoView {
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (confirm, set_confirm) = create_signal(String::new());

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let portal = portal.get_value();
        let (email, password, confirm) = (
            email.get_untracked(),
            password.get_untracked(),
            confirm.get_untracked(),
        );
        spawn_local(async move {
            portal.signup(&email, &password, &confirm).await;
        });
    };

    view! {
        <section id=Page::Signup.id() class="page" class:active=page_active(signals, Page::Signup)>
            <div class="card auth-card">
                <h2>"Create client account"</h2>
                <form id="signupForm" on:submit=on_submit>
                    <label for="signupEmail">"Email"</label>
                    <input id="signupEmail" type="email" required
                        prop:value=move || email.get()
                        on:input=move |e| set_email.set(event_target_value(&e))
                    />
                    <label for="signupPassword">"Password"</label>
                    <input id="signupPassword" type="password" required
                        prop:value=move || password.get()
                        on:input=move |e| set_password.set(event_target_value(&e))
                    />
                    <label for="confirmPassword">"Confirm password"</label>
                    <input id="confirmPassword" type="password" required
                        prop:value=move || confirm.get()
                        on:input=move |e| set_confirm.set(event_target_value(&e))
                    />
                    <button type="submit" class="btn primary full">"Sign Up"</button>
                </form>
            </div>
        </section>
    }
}

#[component]
fn VerificationPage(portal: StoredValue<Rc<BrowserPortal>>, signals: SignalView) -> impl IntoView {
    let token = signals.verification_token;

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let portal = portal.get_value();
        let token = token.get_untracked();
        spawn_local(async move {
            portal.verify_email(&token).await;
        });
    };

    view! {
        <section id=Page::Verification.id() class="page" class:active=page_active(signals, Page::Verification)>
            <div class="card auth-card">
                <h2>"Verify your email"</h2>
                <p>"Paste the token from the verification email."</p>
                <form id="verificationForm" on:submit=on_submit>
                    <input id="verificationToken" type="text" required
                        prop:value=move || token.get()
                        on:input=move |e| token.set(event_target_value(&e))
                    />
                    <button type="submit" class="btn primary full">"Verify"</button>
                </form>
            </div>
        </section>
    }
}

#[component]
fn OpsDashboard(
    portal: StoredValue<Rc<BrowserPortal>>,
    signals: SignalView,
    debug_mode: bool,
) -> impl IntoView {
    view! {
        <section id=Page::OpsDashboard.id() class="page" class:active=page_active(signals, Page::OpsDashboard)>
            <h2>"Ops dashboard"</h2>
            <div class="card">
                <UploadWidget portal=portal signals=signals debug_mode=debug_mode />
            </div>
            <div class="card">
                <h3>"Recent uploads"</h3>
                <div id="opsFilesList">
                    <Show
                        when=move || !signals.ops_files.get().is_empty()
                        fallback=|| view! { <p>"No files uploaded yet."</p> }
                    >
                        <For
                            each=move || signals.ops_files.get()
                            key=|file| file.id
                            let:file
                        >
                            <FileRow file=file />
                        </For>
                    </Show>
                </div>
            </div>
        </section>
    }
}

#[component]
fn UploadWidget(
    portal: StoredValue<Rc<BrowserPortal>>,
    signals: SignalView,
    debug_mode: bool,
) -> impl IntoView {
    let (dragging, set_dragging) = create_signal(false);
    let file_input_ref = create_node_ref::<leptos::html::Input>();

    // Clear the native input once the widget is back to empty
    create_effect(move |_| {
        if signals.upload.get() == UploadView::Idle {
            if let Some(input) = file_input_ref.get_untracked() {
                input.set_value("");
            }
        }
    });

    let pick_first = move |files: Option<web_sys::FileList>| {
        let Some(files) = files else {
            log::debug!("file event without a file list");
            return;
        };
        let first: Option<File> = FileList::from(files).first().cloned();
        match first {
            Some(file) => portal.get_value().pick_file(file),
            None => log::debug!("file event with an empty file list"),
        }
    };

    let on_file_change = move |_ev: Event| {
        if let Some(input) = file_input_ref.get_untracked() {
            pick_first(input.files());
        }
    };

    let on_area_click = move |_| {
        if let Some(input) = file_input_ref.get_untracked() {
            input.click();
        }
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_dragging.set(false);
        pick_first(ev.data_transfer().and_then(|dt| dt.files()));
    };

    let on_upload_click = move |_| {
        let portal = portal.get_value();
        spawn_local(async move {
            portal.submit_upload().await;
        });
    };

    view! {
        <form id="uploadForm" on:submit=move |ev: SubmitEvent| ev.prevent_default()>
            <input
                type="file"
                id="fileInput"
                accept=".pptx,.docx,.xlsx"
                style="display: none;"
                ref=file_input_ref
                on:change=on_file_change
                on:keydown=move |ev: web_sys::KeyboardEvent| {
                    if ev.key() == "Enter" {
                        ev.prevent_default();
                    }
                }
            />
            <div
                id="fileUploadArea"
                class="file-upload-area"
                class:dragover=move || dragging.get()
                on:click=on_area_click
                on:dragover=move |ev: DragEvent| {
                    ev.prevent_default();
                    set_dragging.set(true);
                }
                on:dragleave=move |ev: DragEvent| {
                    ev.prevent_default();
                    set_dragging.set(false);
                }
                on:drop=on_drop
            >
                {move || match signals.upload.get() {
                    UploadView::Ready { name, size } => view! {
                        <i class="fas fa-file-circle-check"></i>
                        <p><strong>{name}</strong></p>
                        <p class="file-types">"Size: " {size}</p>
                    }.into_view(),
                    UploadView::Submitting { name } => view! {
                        <i class="fas fa-spinner"></i>
                        <p>"Uploading " <strong>{name}</strong> "..."</p>
                    }.into_view(),
                    UploadView::Rejected { name } => view! {
                        <i class="fas fa-file-circle-xmark"></i>
                        <p><strong>{name}</strong> " is not a supported file"</p>
                        <p class="file-types">"Supported: .pptx, .docx, .xlsx"</p>
                    }.into_view(),
                    UploadView::Idle => view! {
                        <i class="fas fa-file-upload"></i>
                        <p>"Drag and drop files here or click to browse"</p>
                        <p class="file-types">"Supported: .pptx, .docx, .xlsx"</p>
                    }.into_view(),
                }}
            </div>

            <Show when=move || debug_mode>
                <div class="debug-line">
                    "debug: " {move || format!("{:?}", signals.upload.get())}
                </div>
            </Show>

            <button
                type="button"
                id="uploadBtn"
                class="btn primary full"
                disabled=move || !signals.upload.get().submit_enabled()
                on:click=on_upload_click
            >
                {move || if matches!(signals.upload.get(), UploadView::Submitting { .. }) { "Uploading..." } else { "Upload" }}
            </button>
        </form>
    }
}

#[component]
fn ClientDashboard(portal: StoredValue<Rc<BrowserPortal>>, signals: SignalView) -> impl IntoView {
    view! {
        <section id=Page::ClientDashboard.id() class="page" class:active=page_active(signals, Page::ClientDashboard)>
            <h2>"Available files"</h2>
            <div id="clientFilesList" class="card">
                <Show
                    when=move || !signals.client_files.get().is_empty()
                    fallback=|| view! { <div class="file-item"><p>"No files available for download."</p></div> }
                >
                    <For
                        each=move || signals.client_files.get()
                        key=|file| file.id
                        let:file
                    >
                        <ClientFileRow portal=portal file=file />
                    </For>
                </Show>
            </div>
        </section>
    }
}

#[component]
fn FileRow(file: FileRecord) -> impl IntoView {
    view! {
        <div class="file-item">
            <div class="file-info">
                <i class=format!("fas {} file-icon", file.file_type.icon())></i>
                <div class="file-details">
                    <h4>{file.original_filename.clone()}</h4>
                    <p>
                        "Size: " {format_file_size(file.file_size)}
                        " • Uploaded: " {format_timestamp(&file)}
                    </p>
                </div>
            </div>
        </div>
    }
}

#[component]
fn ClientFileRow(portal: StoredValue<Rc<BrowserPortal>>, file: FileRecord) -> impl IntoView {
    let file_id = file.id;
    let on_download = move |_| {
        let portal = portal.get_value();
        spawn_local(async move {
            portal.download(file_id).await;
        });
    };

    view! {
        <div class="file-item">
            <div class="file-info">
                <i class=format!("fas {} file-icon", file.file_type.icon())></i>
                <div class="file-details">
                    <h4>{file.original_filename.clone()}</h4>
                    <p>"Size: " {format_file_size(file.file_size)}</p>
                    <p>"Uploaded by: " {file.uploaded_by.clone()}</p>
                    <p>"Date: " {format_timestamp(&file)}</p>
                </div>
            </div>
            <div class="file-actions">
                <button class="btn primary small" on:click=on_download>
                    <i class="fas fa-download"></i>
                    " Download"
                </button>
            </div>
        </div>
    }
}

fn format_timestamp(file: &FileRecord) -> String {
    file.uploaded_at.format("%Y-%m-%d %H:%M").to_string()
}

#[component]
fn ToastView(signals: SignalView) -> impl IntoView {
    let kind = move || {
        signals
            .toast
            .get()
            .map(|shown| shown.toast.kind)
            .unwrap_or(ToastKind::Info)
    };

    view! {
        <div
            id="toast"
            class=move || {
                let visible = if signals.toast.get().is_some() { " show" } else { "" };
                format!("toast {}{}", kind().class(), visible)
            }
        >
            <i class=move || format!("toast-icon {}", kind().icon())></i>
            <span class="toast-message">
                {move || signals.toast.get().map(|shown| shown.toast.message).unwrap_or_default()}
            </span>
        </div>
    }
}

fn install_error_handler(portal: Rc<BrowserPortal>) {
    let handler = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let detail = event
            .dyn_ref::<web_sys::ErrorEvent>()
            .map(|e| e.message())
            .unwrap_or_else(|| event.type_());
        portal.report_unexpected(&detail);
    });

    if let Err(e) =
        window().add_event_listener_with_callback("error", handler.as_ref().unchecked_ref())
    {
        log::error!("failed to install error handler: {:?}", e);
    }
    // The page owns the listener for its whole lifetime
    handler.forget();
}

fn verification_token_from_location() -> Option<String> {
    let search = window().location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search)
        .ok()?
        .get("token")
}

#[wasm_bindgen]
pub fn run() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::error_1(&format!("logger init failed: {}", e).into());
    }

    wasm_bindgen_futures::spawn_local(async {
        let config = load_config().await;
        log::info!("using API at {}", config.api_base_url);
        let verification_token = verification_token_from_location();
        mount_to_body(move || {
            view! { <App config=config verification_token=verification_token /> }
        });
    });
}

// CSS-in-Rust: page styles as a const string
const MAIN_STYLES: &str = r#"
body {
    font-family: "Inter", system-ui, sans-serif;
    background: #f5f7fb;
    color: #1f2933;
    margin: 0;
}

.navbar {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 16px 32px;
    background: #1f2933;
    color: #fff;
}

.nav-brand { font-weight: 600; cursor: pointer; }
.nav-actions { display: flex; gap: 8px; }

.container { max-width: 960px; margin: 32px auto; padding: 0 16px; }

.page { display: none; }
.page.active { display: block; }

.hero { text-align: center; padding: 64px 0; }
.hero-actions { display: flex; justify-content: center; gap: 12px; }

.card {
    background: #fff;
    border-radius: 8px;
    box-shadow: 0 1px 3px rgba(0, 0, 0, 0.08);
    padding: 24px;
    margin-bottom: 24px;
}

.auth-card { max-width: 420px; margin: 0 auto; }
.auth-card form { display: flex; flex-direction: column; gap: 8px; }
.auth-card input { padding: 10px; border: 1px solid #cbd2d9; border-radius: 4px; }

.btn {
    border: none;
    border-radius: 4px;
    padding: 10px 18px;
    cursor: pointer;
    font-size: 14px;
}
.btn.primary { background: #3b82f6; color: #fff; }
.btn.secondary { background: #e4e7eb; color: #1f2933; }
.btn.small { padding: 6px 12px; }
.btn.full { width: 100%; margin-top: 12px; }
.btn:disabled { opacity: 0.5; cursor: not-allowed; }

.user-type-selector { display: flex; gap: 8px; margin-bottom: 16px; }
.user-type-btn {
    flex: 1;
    padding: 8px;
    border: 1px solid #cbd2d9;
    background: #fff;
    border-radius: 4px;
    cursor: pointer;
}
.user-type-btn.active { background: #3b82f6; color: #fff; border-color: #3b82f6; }

.file-upload-area {
    border: 2px dashed #cbd2d9;
    border-radius: 8px;
    padding: 32px;
    text-align: center;
    cursor: pointer;
}
.file-upload-area.dragover { border-color: #3b82f6; background: #eff6ff; }
.file-types { color: #7b8794; font-size: 13px; }
.debug-line { color: #7b8794; font-size: 12px; margin-top: 8px; }

.file-item {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 12px 0;
    border-bottom: 1px solid #e4e7eb;
}
.file-info { display: flex; gap: 12px; align-items: center; }
.file-icon { font-size: 28px; color: #3b82f6; }
.file-details h4 { margin: 0 0 4px 0; }
.file-details p { margin: 0; color: #616e7c; font-size: 13px; }

.toast {
    position: fixed;
    right: 24px;
    bottom: 24px;
    padding: 12px 18px;
    border-radius: 6px;
    background: #1f2933;
    color: #fff;
    opacity: 0;
    transform: translateY(20px);
    transition: all 0.3s ease;
}
.toast.show { opacity: 1; transform: translateY(0); }
.toast.success { background: #16a34a; }
.toast.error { background: #dc2626; }

.loading-overlay {
    position: fixed;
    inset: 0;
    background: rgba(255, 255, 255, 0.6);
    display: none;
    align-items: center;
    justify-content: center;
}
.loading-overlay.show { display: flex; }
.spinner {
    width: 40px;
    height: 40px;
    border: 4px solid #cbd2d9;
    border-top-color: #3b82f6;
    border-radius: 50%;
    animation: spin 1s linear infinite;
}
@keyframes spin { to { transform: rotate(360deg); } }
"#;

// CSS-in-Rust: Component that injects styles
#[component]
fn StyleProvider() -> impl IntoView {
    view! {
        <style>{MAIN_STYLES}</style>
    }
}
