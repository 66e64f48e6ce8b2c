//! Noyau sûr (liste blanche)
//!
//! Organisation interne :
//! - jetons.rs    : tokenisation
//! - rpn.rs       : shunting-yard (avec validation) + construction de l’arbre
//! - arbre.rs     : arbre syntaxique fermé + rendu texte
//! - analyse.rs   : affectation de premier niveau + pipeline complet
//! - nombre.rs    : entier exact / réel + affichage
//! - fonctions.rs : opérateurs, fonctions et constantes permis
//! - eval.rs      : parcours de l’arbre + trace
//! - variables.rs : liaisons ordonnées
//! - session.rs   : historique, undo, clear, session partagée
//! - commande.rs  : console (commandes ":")

pub mod analyse;
pub mod arbre;
pub mod commande;
pub mod erreur;
pub mod eval;
pub mod fonctions;
pub mod jetons;
pub mod nombre;
pub mod rpn;
pub mod session;
pub mod variables;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

#[cfg(test)]
mod tests_proprietes;

// API publique minimale
pub use analyse::{parse, parse_expression};
pub use arbre::{Instruction, Noeud};
pub use commande::Console;
pub use erreur::{CalcError, Resultat};
pub use nombre::Nombre;
pub use session::{EntreeHistorique, Session, SessionPartagee};
