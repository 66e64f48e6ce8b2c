// src/app/vue.rs
//
// Vue (UI egui), natif + web
// ---------------------------
// - Enter évalue (quand le champ a le focus), Esc efface l’entrée (app.rs)
// - Boutons : insertion de symboles, "=", Annuler, Effacer, C, case Trace
// - Panneaux : Résultat, Trace, Variables, Historique, Démarche, Journal
//
// Tout passe par la console du noyau : les boutons Annuler/Effacer envoient
// ":undo" / ":clear", la case Trace envoie ":trace on|off".

use eframe::egui;

use super::etat::{AppCalc, HISTORIQUE_AFFICHE_MAX};

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice sûre");
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_resultats(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_session(ui);
                self.ui_demarche(ui);
                self.ui_journal(ui);
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Entrée :");

        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: x = 2**10, sqrt(16) + sin(pi/2), :help")
                .id_source("entree_edit")
                .code_editor(),
        );

        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // TextEdit singleline perd le focus sur Enter : on teste lost_focus.
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (resp.has_focus() || resp.lost_focus()) && enter {
            self.evaluer_entree();
        }

        ui.add_space(6.0);

        ui.horizontal(|ui| {
            self.bouton_action(ui, "C", "Efface seulement l’entrée", Action::ClearEntree);
            self.bouton_action(ui, "Annuler", "Annule la dernière entrée (:undo)", Action::Annuler);
            self.bouton_action(ui, "Effacer", "Efface variables et historique (:clear)", Action::Effacer);

            ui.separator();

            let mut trace = self.console.trace_active();
            if ui.checkbox(&mut trace, "Trace").changed() {
                let cmd = if trace { ":trace on" } else { ":trace off" };
                self.soumettre(cmd);
            }
        });

        ui.add_space(8.0);

        ui.horizontal_wrapped(|ui| {
            for s in ["(", ")", ",", "="] {
                self.bouton_insert(ui, s, s, InsertKind::Ponctuation);
            }

            ui.separator();

            for op in ["+", "-", "*", "/", "%", "**"] {
                self.bouton_insert(ui, op, op, InsertKind::Op);
            }

            ui.separator();

            self.bouton_insert(ui, "π", "pi", InsertKind::Mot);
            self.bouton_insert(ui, "e", "e", InsertKind::Mot);
            for f in ["sqrt", "sin", "cos", "tan", "log", "exp", "factorial"] {
                self.bouton_insert(ui, f, &format!("{f}("), InsertKind::Mot);
            }

            ui.add_space(10.0);

            let eq = ui.add_sized([64.0, 32.0], egui::Button::new("Évaluer"));
            if eq.clicked() {
                self.evaluer_entree();
            }
        });

        ui.add_space(8.0);

        self.ui_pave_numerique(ui);

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }
    }

    fn ui_pave_numerique(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_numerique")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for rangee in [["7", "8", "9"], ["4", "5", "6"], ["1", "2", "3"]] {
                    for c in rangee {
                        self.bouton_insert(ui, c, c, InsertKind::Chiffre);
                    }
                    ui.end_row();
                }
                self.bouton_insert(ui, "0", "0", InsertKind::Chiffre);
                self.bouton_insert(ui, ".", ".", InsertKind::Chiffre);
                self.bouton_action(ui, "DEL", "Efface le dernier caractère", Action::Backspace);
                ui.end_row();
            });
    }

    fn ui_resultats(&mut self, ui: &mut egui::Ui) {
        ui.label("Résultat :");
        Self::champ_monospace(ui, "resultat_out", &self.resultat, 1);

        if !self.trace.is_empty() {
            ui.add_space(6.0);
            ui.label("Trace :");
            Self::champ_monospace(ui, "trace_out", &self.trace.join("\n"), self.trace.len());
        }
    }

    fn ui_session(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Variables")
            .default_open(true)
            .show(ui, |ui| {
                let vars = self.console.session().variables();
                if vars.is_empty() {
                    ui.monospace("(aucune variable)");
                } else {
                    let lignes: Vec<String> = vars.iter().map(|(k, v)| format!("{k} = {v}")).collect();
                    Self::champ_monospace(ui, "variables_out", &lignes.join("\n"), lignes.len());
                }
            });

        egui::CollapsingHeader::new("Historique")
            .default_open(false)
            .show(ui, |ui| {
                let h = self.console.session().history();
                if h.is_empty() {
                    ui.monospace("(historique vide)");
                    return;
                }
                let debut = h.len().saturating_sub(HISTORIQUE_AFFICHE_MAX);
                let lignes: Vec<String> = h[debut..]
                    .iter()
                    .map(|e| format!("{} -> {}", e.texte, e.resultat))
                    .collect();
                Self::champ_monospace(ui, "historique_out", &lignes.join("\n"), lignes.len());
            });
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Démarche")
            .default_open(false)
            .show(ui, |ui| {
                Self::champ_demarche(ui, "Jetons", "demarche_jetons", &self.demarche.jetons);
                Self::champ_demarche(ui, "RPN", "demarche_rpn", &self.demarche.rpn);
                Self::champ_demarche(ui, "Arbre", "demarche_arbre", &self.demarche.arbre);
            });
    }

    fn ui_journal(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Journal")
            .default_open(false)
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("journal_scroll")
                    .max_height(160.0)
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for l in &self.journal {
                            ui.monospace(l);
                        }
                    });
            });
    }

    fn champ_demarche(ui: &mut egui::Ui, titre: &str, id: &str, contenu: &str) {
        ui.add_space(4.0);
        ui.label(format!("{titre} :"));
        Self::champ_monospace(ui, id, contenu, 1);
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows.max(1) as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([64.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::ClearEntree => self.clear_entree(),
                Action::Annuler => self.soumettre(":undo"),
                Action::Effacer => self.soumettre(":clear"),
                Action::Backspace => {
                    self.entree.pop();
                }
            }
            self.focus_entree = true;
        }
    }

    fn bouton_insert(&mut self, ui: &mut egui::Ui, label: &str, to_insert: &str, kind: InsertKind) {
        let resp = ui.add_sized([46.0, 28.0], egui::Button::new(label));
        if !resp.clicked() {
            return;
        }

        match kind {
            InsertKind::Op => {
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                if !self.entree.is_empty() {
                    self.entree.push(' ');
                }
                self.entree.push_str(to_insert);
                self.entree.push(' ');
            }
            InsertKind::Mot => {
                // pas de multiplication implicite : on sépare d’un chiffre ou d’une ')'
                let last = self.entree.chars().rev().find(|c| !c.is_whitespace());
                if matches!(last, Some(c) if c.is_ascii_alphanumeric() || c == ')') {
                    self.entree.push(' ');
                }
                self.entree.push_str(to_insert);
            }
            InsertKind::Chiffre | InsertKind::Ponctuation => self.entree.push_str(to_insert),
        }

        self.focus_entree = true;
    }

    fn evaluer_entree(&mut self) {
        let ligne = self.entree.clone();
        if ligne.trim().is_empty() {
            self.focus_entree = true;
            return;
        }
        self.soumettre(&ligne);
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    ClearEntree,
    Annuler,
    Effacer,
    Backspace,
}

#[derive(Clone, Copy, Debug)]
enum InsertKind {
    Chiffre,
    Mot,
    Op,
    Ponctuation,
}
