// src/noyau/analyse.rs
//
// Analyse d’une ligne : affectation de premier niveau puis pipeline
// jetons -> RPN -> arbre.
//
// L’affectation est reconnue UNE fois, en coupant sur le premier '='.
// Un second '=' (ex: "a = b = 1", "a == 1") reste dans la partie droite et
// y est refusé par le lexer.

use super::arbre::{Instruction, Noeud};
use super::erreur::{CalcError, Resultat};
use super::jetons::tokenize;
use super::rpn::{from_rpn, to_rpn};

/// Identifiant : [a-zA-Z_][a-zA-Z0-9_]*
pub fn est_identifiant(s: &str) -> bool {
    let mut it = s.chars();
    match it.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    it.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Coupe "var = expr" sur le premier '=' (les deux côtés rognés).
/// Ne valide pas le nom : c’est le rôle de `parse`.
pub fn separer_affectation(texte: &str) -> Option<(&str, &str)> {
    texte
        .split_once('=')
        .map(|(gauche, droite)| (gauche.trim(), droite.trim()))
}

/// Analyse une expression seule (sans affectation).
pub fn parse_expression(texte: &str) -> Resultat<Noeud> {
    let s = texte.trim();
    if s.is_empty() {
        return Err(CalcError::syntaxe("expression vide"));
    }
    let jetons = tokenize(s)?;
    let rpn = to_rpn(&jetons)?;
    from_rpn(&rpn)
}

/// Analyse une ligne complète : expression ou affectation.
pub fn parse(texte: &str) -> Resultat<Instruction> {
    let s = texte.trim();
    if s.is_empty() {
        return Err(CalcError::syntaxe("expression vide"));
    }

    match separer_affectation(s) {
        Some((variable, droite)) => {
            if !est_identifiant(variable) {
                return Err(CalcError::InvalidVariableName(variable.to_string()));
            }
            Ok(Instruction::Affectation {
                variable: variable.to_string(),
                expr: parse_expression(droite)?,
            })
        }
        None => Ok(Instruction::Expression(parse_expression(s)?)),
    }
}
