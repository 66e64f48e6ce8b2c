// src/noyau/fonctions.rs
//
// Liste blanche fermée : opérateurs, fonctions, constantes.
//
// Règle (SAFE) :
// - Un nom (texte) ne devient exécutable QUE via `depuis_nom`, qui ne connaît
//   que les variantes ci-dessous. Ajouter une fonction = ajouter une variante.
// - Les erreurs de domaine (√ négatif, log(0), factorial(-1)…) remontent en
//   CalcError::Math, jamais en panique.

use std::f64::consts;

use num_traits::ToPrimitive;

use super::erreur::{CalcError, Resultat};
use super::nombre::{self, Nombre};

/* ------------------------ Opérateurs ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpBinaire {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl OpBinaire {
    pub fn appliquer(self, a: Nombre, b: Nombre) -> Resultat<Nombre> {
        match self {
            OpBinaire::Add => Ok(nombre::ajouter(a, b)),
            OpBinaire::Sub => Ok(nombre::soustraire(a, b)),
            OpBinaire::Mul => Ok(nombre::multiplier(a, b)),
            OpBinaire::Div => nombre::diviser(a, b),
            OpBinaire::Mod => nombre::modulo(a, b),
            OpBinaire::Pow => nombre::puissance(a, b),
        }
    }

    /// Nom affiché dans la trace ("2 Mult 3 -> 6").
    pub fn nom_trace(self) -> &'static str {
        match self {
            OpBinaire::Add => "Add",
            OpBinaire::Sub => "Sub",
            OpBinaire::Mul => "Mult",
            OpBinaire::Div => "Div",
            OpBinaire::Mod => "Mod",
            OpBinaire::Pow => "Pow",
        }
    }

    pub fn symbole(self) -> &'static str {
        match self {
            OpBinaire::Add => "+",
            OpBinaire::Sub => "-",
            OpBinaire::Mul => "*",
            OpBinaire::Div => "/",
            OpBinaire::Mod => "%",
            OpBinaire::Pow => "**",
        }
    }

    /// Priorité (plus grand = lie plus fort). Le moins unaire se place entre 2 et 4.
    pub fn priorite(self) -> u8 {
        match self {
            OpBinaire::Add | OpBinaire::Sub => 1,
            OpBinaire::Mul | OpBinaire::Div | OpBinaire::Mod => 2,
            OpBinaire::Pow => 4,
        }
    }

    pub fn associatif_droite(self) -> bool {
        matches!(self, OpBinaire::Pow)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpUnaire {
    Neg,
    Pos,
}

impl OpUnaire {
    pub const PRIORITE: u8 = 3;

    pub fn appliquer(self, a: Nombre) -> Nombre {
        match self {
            OpUnaire::Neg => nombre::oppose(a),
            OpUnaire::Pos => a,
        }
    }

    pub fn nom_trace(self) -> &'static str {
        match self {
            OpUnaire::Neg => "USub",
            OpUnaire::Pos => "UAdd",
        }
    }

    pub fn symbole(self) -> &'static str {
        match self {
            OpUnaire::Neg => "-",
            OpUnaire::Pos => "+",
        }
    }
}

/* ------------------------ Constantes ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Constante {
    Pi,
    E,
}

impl Constante {
    pub fn depuis_nom(nom: &str) -> Option<Self> {
        match nom {
            "pi" => Some(Constante::Pi),
            "e" => Some(Constante::E),
            _ => None,
        }
    }

    pub fn valeur(self) -> Nombre {
        match self {
            Constante::Pi => Nombre::Reel(consts::PI),
            Constante::E => Nombre::Reel(consts::E),
        }
    }
}

/* ------------------------ Fonctions ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Log,
    Log10,
    Exp,
    Factorial,
    Floor,
    Ceil,
    Fabs,
}

impl Fonction {
    pub const TOUTES: [Fonction; 11] = [
        Fonction::Sin,
        Fonction::Cos,
        Fonction::Tan,
        Fonction::Sqrt,
        Fonction::Log,
        Fonction::Log10,
        Fonction::Exp,
        Fonction::Factorial,
        Fonction::Floor,
        Fonction::Ceil,
        Fonction::Fabs,
    ];

    pub fn depuis_nom(nom: &str) -> Option<Self> {
        Self::TOUTES.iter().copied().find(|f| f.nom() == nom)
    }

    pub fn nom(self) -> &'static str {
        match self {
            Fonction::Sin => "sin",
            Fonction::Cos => "cos",
            Fonction::Tan => "tan",
            Fonction::Sqrt => "sqrt",
            Fonction::Log => "log",
            Fonction::Log10 => "log10",
            Fonction::Exp => "exp",
            Fonction::Factorial => "factorial",
            Fonction::Floor => "floor",
            Fonction::Ceil => "ceil",
            Fonction::Fabs => "fabs",
        }
    }

    pub fn appliquer(self, args: &[Nombre]) -> Resultat<Nombre> {
        match (self, args) {
            (Fonction::Log, [x, base]) => log_base(*x, *base).map(Nombre::Reel),
            (_, [x]) => self.appliquer_un(*x),
            (Fonction::Log, _) => Err(self.arite("1 ou 2", args.len())),
            _ => Err(self.arite("1", args.len())),
        }
    }

    fn appliquer_un(self, x: Nombre) -> Resultat<Nombre> {
        match self {
            Fonction::Sin => trig(x, f64::sin),
            Fonction::Cos => trig(x, f64::cos),
            Fonction::Tan => trig(x, f64::tan),
            Fonction::Sqrt => {
                let v = x.as_f64();
                if v < 0.0 {
                    return Err(erreur_domaine());
                }
                Ok(Nombre::Reel(v.sqrt()))
            }
            Fonction::Log => log_naturel(x).map(Nombre::Reel),
            Fonction::Log10 => {
                let v = x.as_f64();
                if v <= 0.0 {
                    return Err(erreur_domaine());
                }
                Ok(Nombre::Reel(v.log10()))
            }
            Fonction::Exp => {
                let v = x.as_f64();
                let r = v.exp();
                if r.is_infinite() && v.is_finite() {
                    return Err(CalcError::math("résultat hors limites"));
                }
                Ok(Nombre::Reel(r))
            }
            Fonction::Factorial => factorielle(x),
            Fonction::Floor => match x {
                Nombre::Entier(_) => Ok(x),
                Nombre::Reel(v) => Nombre::depuis_arrondi(v.floor()),
            },
            Fonction::Ceil => match x {
                Nombre::Entier(_) => Ok(x),
                Nombre::Reel(v) => Nombre::depuis_arrondi(v.ceil()),
            },
            Fonction::Fabs => Ok(Nombre::Reel(x.as_f64().abs())),
        }
    }

    fn arite(self, attendu: &str, recu: usize) -> CalcError {
        CalcError::Arity {
            fonction: self.nom().to_string(),
            attendu: attendu.to_string(),
            recu,
        }
    }
}

fn erreur_domaine() -> CalcError {
    CalcError::math("erreur de domaine")
}

fn trig(x: Nombre, f: fn(f64) -> f64) -> Resultat<Nombre> {
    let v = x.as_f64();
    if v.is_infinite() {
        return Err(erreur_domaine());
    }
    Ok(Nombre::Reel(f(v)))
}

fn log_naturel(x: Nombre) -> Resultat<f64> {
    let v = x.as_f64();
    if v <= 0.0 {
        return Err(erreur_domaine());
    }
    Ok(v.ln())
}

fn log_base(x: Nombre, base: Nombre) -> Resultat<f64> {
    let num = log_naturel(x)?;
    let den = log_naturel(base)?;
    if den == 0.0 {
        return Err(CalcError::math("division par zéro (base 1)"));
    }
    Ok(num / den)
}

/// n! : entier tant que ça tient dans i64, puis réel ; au-delà de f64 => erreur.
fn factorielle(x: Nombre) -> Resultat<Nombre> {
    let n = match x {
        Nombre::Reel(v) if v.is_finite() && v.fract() == 0.0 && v > 0.0 && v.to_i64().is_none() => {
            return Err(CalcError::math("résultat hors limites"));
        }
        _ => x
            .vers_entier_exact()
            .ok_or_else(|| CalcError::math("factorial() n’accepte que des valeurs entières"))?,
    };
    if n < 0 {
        return Err(CalcError::math("factorial() non définie pour les valeurs négatives"));
    }

    let mut acc: i64 = 1;
    let mut k: i64 = 2;
    while k <= n {
        match acc.checked_mul(k) {
            Some(v) => acc = v,
            None => break,
        }
        k += 1;
    }
    if k > n {
        return Ok(Nombre::Entier(acc));
    }

    // suite en réel (borné : f64 déborde avant 171!)
    let mut r = acc as f64;
    while k <= n {
        r *= k as f64;
        if r.is_infinite() {
            return Err(CalcError::math("résultat hors limites"));
        }
        k += 1;
    }
    Ok(Nombre::Reel(r))
}
