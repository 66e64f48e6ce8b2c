//! Session de calcul : variables + historique, avec annulation.
//!
//! Contrats :
//! - Évaluer PUIS valider : le résultat est calculé entièrement avant toute
//!   écriture ; en cas d’erreur, variables et historique restent intacts.
//! - `undo` retire la dernière entrée ; si c’était une affectation à `v`,
//!   `v` est supprimée (la valeur précédente de `v` n’est PAS restaurée).
//! - `clear` est idempotent.
//!
//! `SessionPartagee` : même API derrière un verrou unique, pour un usage multi-thread.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use super::analyse::{parse, separer_affectation};
use super::arbre::Instruction;
use super::erreur::{CalcError, Resultat};
use super::eval::evaluate;
use super::jetons::{format_tokens, tokenize};
use super::nombre::Nombre;
use super::rpn::{format_rpn, to_rpn};
use super::variables::Variables;

/// Entrée d’historique (immuable une fois ajoutée).
#[derive(Clone, Debug, PartialEq)]
pub struct EntreeHistorique {
    pub texte: String,
    pub resultat: Nombre,
}

impl EntreeHistorique {
    /// Variable affectée par cette entrée ("a = 5" -> Some("a")).
    pub fn variable_affectee(&self) -> Option<&str> {
        separer_affectation(&self.texte).map(|(v, _)| v)
    }
}

/// Démarche : étapes intermédiaires (affichage seulement).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Demarche {
    pub jetons: String,
    pub rpn: String,
    pub arbre: String,
}

/// Résultat détaillé d’une évaluation réussie.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub resultat: Nombre,
    pub trace: Vec<String>,
    pub demarche: Demarche,
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    variables: Variables,
    historique: Vec<EntreeHistorique>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// API publique : évalue une expression ou une affectation.
    /// Retourne (résultat, trace) ; trace vide si `trace == false`.
    pub fn evaluate(&mut self, texte: &str, trace: bool) -> Resultat<(Nombre, Vec<String>)> {
        let (_, resultat, lignes) = self.executer(texte, trace)?;
        Ok((resultat, lignes))
    }

    /// Comme `evaluate`, avec la démarche (jetons, RPN, arbre) pour l’affichage.
    pub fn evaluate_detaille(&mut self, texte: &str, trace: bool) -> Resultat<Evaluation> {
        let (instruction, resultat, lignes) = self.executer(texte, trace)?;
        Ok(Evaluation {
            resultat,
            trace: lignes,
            demarche: demarche(texte.trim(), &instruction),
        })
    }

    fn executer(&mut self, texte: &str, trace: bool) -> Resultat<(Instruction, Nombre, Vec<String>)> {
        let s = texte.trim();
        if s.is_empty() {
            return Err(CalcError::EmptyExpression);
        }

        // 1) analyse + évaluation (aucune écriture)
        let instruction = parse(s)?;
        let (resultat, lignes) = evaluate(instruction.expr(), &self.variables, trace)?;

        // 2) validation
        if let Instruction::Affectation { variable, .. } = &instruction {
            self.variables.inserer(variable, resultat);
        }
        self.historique.push(EntreeHistorique {
            texte: s.to_string(),
            resultat,
        });

        debug!(texte = s, %resultat, etapes = lignes.len(), "évaluation");
        Ok((instruction, resultat, lignes))
    }

    pub fn undo(&mut self) -> Resultat<()> {
        let entree = self.historique.pop().ok_or(CalcError::NothingToUndo)?;
        if let Some(v) = entree.variable_affectee() {
            self.variables.retirer(v);
        }
        info!(texte = %entree.texte, "annulation");
        Ok(())
    }

    pub fn clear(&mut self) {
        self.variables.vider();
        self.historique.clear();
        info!("session effacée");
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn history(&self) -> &[EntreeHistorique] {
        &self.historique
    }
}

/// Démarche d’une instruction déjà analysée (le texte est donc valide).
fn demarche(texte: &str, instruction: &Instruction) -> Demarche {
    let expr_txt = match instruction {
        Instruction::Affectation { .. } => separer_affectation(texte).map_or(texte, |(_, d)| d),
        Instruction::Expression(_) => texte,
    };
    let jetons = tokenize(expr_txt).unwrap_or_default();
    let rpn = to_rpn(&jetons).map(|r| format_rpn(&r)).unwrap_or_default();
    Demarche {
        jetons: format_tokens(&jetons),
        rpn,
        arbre: instruction.to_string(),
    }
}

/* ------------------------ Session partagée ------------------------ */

/// Session derrière un verrou unique : chaque opération est atomique.
#[derive(Clone, Debug, Default)]
pub struct SessionPartagee {
    inner: Arc<Mutex<Session>>,
}

impl SessionPartagee {
    pub fn new() -> Self {
        Self::default()
    }

    fn verrou(&self) -> MutexGuard<'_, Session> {
        // Verrou empoisonné : l’état reste cohérent (évaluer puis valider), on continue.
        self.inner.lock().unwrap_or_else(|e| {
            warn!("verrou de session empoisonné, récupération");
            e.into_inner()
        })
    }

    pub fn evaluate(&self, texte: &str, trace: bool) -> Resultat<(Nombre, Vec<String>)> {
        self.verrou().evaluate(texte, trace)
    }

    pub fn undo(&self) -> Resultat<()> {
        self.verrou().undo()
    }

    pub fn clear(&self) {
        self.verrou().clear()
    }

    /// Copie des variables (ordre d’insertion).
    pub fn variables(&self) -> Vec<(String, Nombre)> {
        self.verrou()
            .variables()
            .iter()
            .map(|(n, v)| (n.to_string(), v))
            .collect()
    }

    /// Copie de l’historique.
    pub fn history(&self) -> Vec<EntreeHistorique> {
        self.verrou().history().to_vec()
    }

    /// Accès exclusif pour une suite d’opérations sous le même verrou.
    pub fn avec<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.verrou())
    }
}
