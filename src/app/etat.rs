//! src/app/etat.rs
//!
//! État UI : entrée, console (session + trace), derniers résultats.
//!
//! Contrats :
//! - Aucune analyse ici : tout passe par `Console::traiter` (noyau).
//! - Une erreur ne touche ni au dernier résultat, ni à la session.
//! - Le journal est borné (JOURNAL_MAX lignes).

use calculatrice_sure::noyau::commande::{Console, Sortie};
use calculatrice_sure::noyau::session::Demarche;
use calculatrice_sure::noyau::CalcError;

/// Trace désactivée au démarrage (comme la console).
pub const TRACE_DEFAUT: bool = false;

/// Nombre d’entrées d’historique affichées (les plus récentes).
pub const HISTORIQUE_AFFICHE_MAX: usize = 50;

/// Garde-fou : lignes conservées dans le journal de console.
const JOURNAL_MAX: usize = 500;

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- noyau ---
    pub console: Console,

    // --- sorties ---
    pub resultat: String,
    pub erreur: String,
    pub trace: Vec<String>,
    pub demarche: Demarche,

    /// Lignes produites par les commandes ":" (et les résultats), plus récentes en bas.
    pub journal: Vec<String>,

    // --- UX ---
    pub focus_entree: bool,
    pub quitter: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self {
            entree: String::new(),
            console: Console::new(TRACE_DEFAUT),
            resultat: String::new(),
            erreur: String::new(),
            trace: Vec::new(),
            demarche: Demarche::default(),
            journal: Vec::new(),
            focus_entree: true,
            quitter: false,
        }
    }
}

impl AppCalc {
    /// C : effacer seulement l’entrée.
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// On CONSERVE `resultat` pour ne pas “effacer l’écran” sur une faute.
    pub fn set_erreur(&mut self, e: &CalcError) {
        self.erreur = format!("Erreur : {e}");
        self.trace.clear();
        self.demarche = Demarche::default();
        self.focus_entree = true;
    }

    pub fn set_resultats(&mut self, resultat: String, trace: Vec<String>, demarche: Demarche) {
        self.erreur.clear();
        self.resultat = resultat;
        self.trace = trace;
        self.demarche = demarche;
        self.focus_entree = true;
    }

    /// Envoie une ligne à la console et dépose sa sortie dans l’état.
    pub fn soumettre(&mut self, ligne: &str) {
        let sortie = self.console.traiter(ligne);
        self.appliquer_sortie(ligne.trim(), sortie);
    }

    pub fn appliquer_sortie(&mut self, ligne: &str, sortie: Sortie) {
        if !ligne.is_empty() {
            self.journaliser(format!("> {ligne}"));
        }
        for l in &sortie.lignes {
            self.journaliser(l.clone());
        }

        match (sortie.evaluation, sortie.erreur) {
            (Some(ev), _) => {
                self.set_resultats(ev.resultat.to_string(), ev.trace, ev.demarche);
                self.entree.clear();
            }
            (None, Some(e)) => self.set_erreur(&e),
            (None, None) => self.erreur.clear(),
        }

        if sortie.quitter {
            self.quitter = true;
        }
        self.focus_entree = true;
    }

    fn journaliser(&mut self, ligne: String) {
        self.journal.push(ligne);
        if self.journal.len() > JOURNAL_MAX {
            let trop = self.journal.len() - JOURNAL_MAX;
            self.journal.drain(..trop);
        }
    }
}
