// src/noyau/arbre.rs
//
// Arbre syntaxique (fermé) produit par rpn.rs, consommé par eval.rs.
// Reconstruit à chaque évaluation, jamais mis en cache.

use std::fmt;

use super::fonctions::{OpBinaire, OpUnaire};
use super::nombre::Nombre;

#[derive(Clone, Debug, PartialEq)]
pub enum Noeud {
    Nombre(Nombre),
    /// Résolu à l’évaluation : variables d’abord, puis constantes (pi, e).
    Ident(String),
    Binaire(OpBinaire, Box<Noeud>, Box<Noeud>),
    Unaire(OpUnaire, Box<Noeud>),
    /// Le nom n’est vérifié contre la liste blanche qu’à l’évaluation.
    Appel(String, Vec<Noeud>),
}

/// Ligne analysée : expression seule, ou affectation de premier niveau.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    Expression(Noeud),
    Affectation { variable: String, expr: Noeud },
}

impl Instruction {
    pub fn expr(&self) -> &Noeud {
        match self {
            Instruction::Expression(e) => e,
            Instruction::Affectation { expr, .. } => expr,
        }
    }
}

impl Noeud {
    fn priorite(&self) -> u8 {
        match self {
            Noeud::Binaire(op, _, _) => op.priorite(),
            Noeud::Unaire(..) => OpUnaire::PRIORITE,
            Noeud::Nombre(_) | Noeud::Ident(_) | Noeud::Appel(..) => u8::MAX,
        }
    }
}

fn ecrire_enfant(f: &mut fmt::Formatter<'_>, n: &Noeud, parentheses: bool) -> fmt::Result {
    if parentheses {
        write!(f, "({n})")
    } else {
        write!(f, "{n}")
    }
}

/// Rendu texte minimal en parenthèses (re-analysable par `parse_expression`).
impl fmt::Display for Noeud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Noeud::Nombre(v) => write!(f, "{v}"),
            Noeud::Ident(nom) => f.write_str(nom),
            Noeud::Appel(nom, args) => {
                write!(f, "{nom}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{a}")?;
                }
                f.write_str(")")
            }
            Noeud::Unaire(op, x) => {
                f.write_str(op.symbole())?;
                ecrire_enfant(f, x, x.priorite() < OpUnaire::PRIORITE)
            }
            Noeud::Binaire(op, a, b) => {
                let p = op.priorite();
                let (par_g, par_d) = if op.associatif_droite() {
                    // (-2)**2 doit garder ses parenthèses ; 2 ** -1 non
                    (a.priorite() <= p, b.priorite() < OpUnaire::PRIORITE)
                } else {
                    (a.priorite() < p, b.priorite() <= p)
                };
                ecrire_enfant(f, a, par_g)?;
                write!(f, " {} ", op.symbole())?;
                ecrire_enfant(f, b, par_d)
            }
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Expression(e) => write!(f, "{e}"),
            Instruction::Affectation { variable, expr } => write!(f, "{variable} = {expr}"),
        }
    }
}
