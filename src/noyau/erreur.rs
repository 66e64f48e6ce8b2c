// src/noyau/erreur.rs
//
// Taxonomie unique des erreurs du noyau.
// Toutes non fatales : l’appelant (shell, UI) affiche le message et continue.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("expression vide")]
    EmptyExpression,

    #[error("nom de variable invalide : {0}")]
    InvalidVariableName(String),

    #[error("erreur de syntaxe : {0}")]
    SyntaxError(String),

    #[error("opérateur non supporté")]
    UnsupportedOperator,

    #[error("opérateur unaire non supporté")]
    UnsupportedUnaryOperator,

    #[error("seuls les appels de fonction simples sont permis")]
    OnlySimpleCallsAllowed,

    #[error("fonction non permise : {0}")]
    FunctionNotAllowed(String),

    #[error("identifiant inconnu : {0}")]
    UnknownIdentifier(String),

    #[error("expression non supportée")]
    UnsupportedExpression,

    #[error("rien à annuler")]
    NothingToUndo,

    /// Domaine / débordement d’une opération permise (√ négatif, 1/0, exp(1000)…).
    #[error("erreur mathématique : {0}")]
    Math(String),

    #[error("{fonction}() attend {attendu} argument(s), {recu} reçu(s)")]
    Arity {
        fonction: String,
        attendu: String,
        recu: usize,
    },
}

impl CalcError {
    pub fn syntaxe(msg: impl Into<String>) -> Self {
        CalcError::SyntaxError(msg.into())
    }

    pub fn math(msg: impl Into<String>) -> Self {
        CalcError::Math(msg.into())
    }
}

pub type Resultat<T> = Result<T, CalcError>;
