use egui::{TextEdit, Ui};

use crate::session::Session;

/// The sign-in form. A mismatch reports failure, clears the secret field and
/// keeps the identifier for retry; there is no lockout.
#[derive(Default)]
pub struct SignInPanel {
    identifier: String,
    secret: String,
    notice: Option<String>,
}

impl SignInPanel {
    /// Returns true when a sign-in succeeded this frame.
    pub fn ui(&mut self, ui: &mut Ui, session: &mut Session) -> bool {
        let mut signed_in = false;

        ui.heading("Sign in");
        ui.add_space(8.0);

        ui.label("Email");
        ui.add(TextEdit::singleline(&mut self.identifier).hint_text("name@example.com"));
        ui.label("Password");
        let secret_response =
            ui.add(TextEdit::singleline(&mut self.secret).password(true));

        let submitted = ui.button("Sign in").clicked()
            || (secret_response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)));

        if submitted {
            if session.sign_in(&self.identifier, &self.secret) {
                self.secret.clear();
                self.notice = None;
                signed_in = true;
            } else {
                self.notice = Some("Invalid username or password.".to_string());
                self.secret.clear();
                secret_response.request_focus();
            }
        }

        if let Some(notice) = &self.notice {
            ui.add_space(4.0);
            ui.colored_label(egui::Color32::LIGHT_RED, notice);
        }

        ui.add_space(8.0);
        ui.small("Edits are kept in memory only; export the CSV to keep them.");

        signed_in
    }
}
