// src/noyau/commande.rs
//
// Console : lignes tapées par l’utilisateur -> commandes ":" ou expressions.
// Pur (aucune E/S) : retourne les lignes à afficher, l’UI décide du rendu.
//
// Commandes :
//   :help  :vars  :history  :undo  :clear  :trace [on|off]  :q / :quit / :exit
// Expression : "2+3" ; suffixe " trace" => trace pour cette ligne seulement.

use tracing::debug;

use super::erreur::CalcError;
use super::session::{Evaluation, Session};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Commande {
    Aide,
    Variables,
    Historique,
    Annuler,
    Effacer,
    /// None = bascule
    Trace(Option<bool>),
    Quitter,
    Inconnue,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ligne {
    Vide,
    Commande(Commande),
    Expression { texte: String, trace: bool },
}

const SUFFIXE_TRACE: &str = " trace";

pub const AIDE: [&str; 7] = [
    ":vars     afficher les variables",
    ":history  afficher l’historique",
    ":undo     annuler la dernière entrée (supprime la variable affectée)",
    ":clear    effacer variables et historique",
    ":trace    activer/désactiver la trace (:trace on / :trace off)",
    ":quit     quitter",
    "<expr> trace   trace pour cette ligne seulement",
];

pub fn analyser_ligne(ligne: &str) -> Ligne {
    let l = ligne.trim();
    if l.is_empty() {
        return Ligne::Vide;
    }

    if let Some(reste) = l.strip_prefix(':') {
        let cmd = reste.trim().to_lowercase();
        let mut mots = cmd.split_whitespace();
        let c = match (mots.next(), mots.next(), mots.next()) {
            (Some("help"), None, _) => Commande::Aide,
            (Some("vars"), None, _) => Commande::Variables,
            (Some("history"), None, _) => Commande::Historique,
            (Some("undo"), None, _) => Commande::Annuler,
            (Some("clear"), None, _) => Commande::Effacer,
            (Some("trace"), None, _) => Commande::Trace(None),
            (Some("trace"), Some("on"), None) => Commande::Trace(Some(true)),
            (Some("trace"), Some("off"), None) => Commande::Trace(Some(false)),
            (Some("q" | "quit" | "exit"), None, _) => Commande::Quitter,
            _ => Commande::Inconnue,
        };
        return Ligne::Commande(c);
    }

    match l.strip_suffix(SUFFIXE_TRACE) {
        Some(expr) => Ligne::Expression {
            texte: expr.trim_end().to_string(),
            trace: true,
        },
        None => Ligne::Expression {
            texte: l.to_string(),
            trace: false,
        },
    }
}

/// Réponse de la console à une ligne.
#[derive(Clone, Debug, Default)]
pub struct Sortie {
    pub lignes: Vec<String>,
    pub evaluation: Option<Evaluation>,
    pub erreur: Option<CalcError>,
    pub quitter: bool,
}

impl Sortie {
    fn texte(lignes: Vec<String>) -> Self {
        Self {
            lignes,
            ..Default::default()
        }
    }

    fn echec(e: CalcError) -> Self {
        Self {
            lignes: vec![format!("Erreur : {e}")],
            erreur: Some(e),
            ..Default::default()
        }
    }
}

/// Console = session + drapeau de trace global.
#[derive(Clone, Debug, Default)]
pub struct Console {
    session: Session,
    trace: bool,
}

impl Console {
    pub fn new(trace: bool) -> Self {
        Self {
            session: Session::new(),
            trace,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn trace_active(&self) -> bool {
        self.trace
    }

    pub fn traiter(&mut self, ligne: &str) -> Sortie {
        let l = analyser_ligne(ligne);
        debug!(?l, "ligne console");
        match l {
            Ligne::Vide => Sortie::default(),
            Ligne::Commande(c) => self.commande(c),
            Ligne::Expression { texte, trace } => self.expression(&texte, trace || self.trace),
        }
    }

    fn commande(&mut self, c: Commande) -> Sortie {
        match c {
            Commande::Aide => Sortie::texte(AIDE.iter().map(|s| s.to_string()).collect()),
            Commande::Variables => {
                let vars = self.session.variables();
                if vars.is_empty() {
                    return Sortie::texte(vec!["(aucune variable)".into()]);
                }
                Sortie::texte(vars.iter().map(|(k, v)| format!("{k} = {v}")).collect())
            }
            Commande::Historique => {
                let h = self.session.history();
                if h.is_empty() {
                    return Sortie::texte(vec!["(historique vide)".into()]);
                }
                Sortie::texte(h.iter().map(|e| format!("{} -> {}", e.texte, e.resultat)).collect())
            }
            Commande::Annuler => match self.session.undo() {
                Ok(()) => Sortie::texte(vec!["Annulé".into()]),
                Err(e) => Sortie::echec(e),
            },
            Commande::Effacer => {
                self.session.clear();
                Sortie::texte(vec!["Effacé".into()])
            }
            Commande::Trace(choix) => {
                self.trace = choix.unwrap_or(!self.trace);
                let etat = if self.trace { "activée" } else { "désactivée" };
                Sortie::texte(vec![format!("Trace {etat}")])
            }
            Commande::Quitter => Sortie {
                quitter: true,
                ..Default::default()
            },
            Commande::Inconnue => Sortie::texte(vec!["Commande inconnue. Utilisez :help".into()]),
        }
    }

    fn expression(&mut self, texte: &str, trace: bool) -> Sortie {
        match self.session.evaluate_detaille(texte, trace) {
            Ok(ev) => {
                let mut lignes = vec![ev.resultat.to_string()];
                if !ev.trace.is_empty() {
                    lignes.push("Trace :".into());
                    lignes.extend(ev.trace.iter().map(|t| format!("   {t}")));
                }
                Sortie {
                    lignes,
                    evaluation: Some(ev),
                    ..Default::default()
                }
            }
            Err(e) => Sortie::echec(e),
        }
    }
}
