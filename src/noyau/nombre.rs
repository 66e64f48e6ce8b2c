// src/noyau/nombre.rs
//
// Nombre = entier exact (i64) ou réel (f64).
// - Entier : littéraux sans '.' ni exposant, et résultats +, -, * entre entiers
// - Reel   : tout le reste (division vraie, fonctions, mélange entier/réel)
//
// Débordement d’un calcul entier : on bascule en réel (pas d’entiers géants).
// Affichage : entier => "5" ; réel entier => "5.0" ; sinon forme la plus courte.

use std::fmt;

use num_traits::{checked_pow, ToPrimitive};

use super::erreur::{CalcError, Resultat};

#[derive(Clone, Copy, Debug)]
pub enum Nombre {
    Entier(i64),
    Reel(f64),
}

use Nombre::{Entier, Reel};

impl Nombre {
    pub fn as_f64(self) -> f64 {
        match self {
            Entier(n) => n as f64,
            Reel(x) => x,
        }
    }

    pub fn est_entier(self) -> bool {
        matches!(self, Entier(_))
    }

    /// Valeur entière exacte : Entier, ou Reel fini sans partie fractionnaire qui tient dans i64.
    pub fn vers_entier_exact(self) -> Option<i64> {
        match self {
            Entier(n) => Some(n),
            Reel(x) if x.is_finite() && x.fract() == 0.0 => x.to_i64(),
            Reel(_) => None,
        }
    }

    /// Résultat de floor/ceil : entier si possible, réel au-delà de i64.
    pub fn depuis_arrondi(x: f64) -> Resultat<Nombre> {
        if !x.is_finite() {
            return Err(CalcError::math("impossible de convertir inf/nan en entier"));
        }
        Ok(x.to_i64().map(Entier).unwrap_or(Reel(x)))
    }
}

/// Égalité numérique : 5 == 5.0 (comme à l’affichage d’une calculatrice).
impl PartialEq for Nombre {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Entier(a), Entier(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl PartialEq<i64> for Nombre {
    fn eq(&self, other: &i64) -> bool {
        *self == Entier(*other)
    }
}

impl PartialEq<f64> for Nombre {
    fn eq(&self, other: &f64) -> bool {
        *self == Reel(*other)
    }
}

impl fmt::Display for Nombre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Entier(n) => write!(f, "{n}"),
            Reel(x) => ecrire_reel(x, f),
        }
    }
}

fn ecrire_reel(x: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("nan");
    }
    if x.is_infinite() {
        return f.write_str(if x > 0.0 { "inf" } else { "-inf" });
    }

    let a = x.abs();
    if a != 0.0 && !(1e-4..1e16).contains(&a) {
        // très grand / très petit : notation scientifique
        return write!(f, "{x:e}");
    }
    if x.fract() == 0.0 {
        write!(f, "{x:.1}")
    } else {
        write!(f, "{x}")
    }
}

/* ------------------------ Arithmétique ------------------------ */

pub fn ajouter(a: Nombre, b: Nombre) -> Nombre {
    match (a, b) {
        (Entier(x), Entier(y)) => x.checked_add(y).map(Entier).unwrap_or(Reel(x as f64 + y as f64)),
        _ => Reel(a.as_f64() + b.as_f64()),
    }
}

pub fn soustraire(a: Nombre, b: Nombre) -> Nombre {
    match (a, b) {
        (Entier(x), Entier(y)) => x.checked_sub(y).map(Entier).unwrap_or(Reel(x as f64 - y as f64)),
        _ => Reel(a.as_f64() - b.as_f64()),
    }
}

pub fn multiplier(a: Nombre, b: Nombre) -> Nombre {
    match (a, b) {
        (Entier(x), Entier(y)) => x.checked_mul(y).map(Entier).unwrap_or(Reel(x as f64 * y as f64)),
        _ => Reel(a.as_f64() * b.as_f64()),
    }
}

/// Division vraie : toujours réelle.
pub fn diviser(a: Nombre, b: Nombre) -> Resultat<Nombre> {
    let d = b.as_f64();
    if d == 0.0 {
        return Err(CalcError::math("division par zéro"));
    }
    Ok(Reel(a.as_f64() / d))
}

/// Modulo “plancher” : le reste prend le signe du diviseur (-7 % 3 == 2).
pub fn modulo(a: Nombre, b: Nombre) -> Resultat<Nombre> {
    if b.as_f64() == 0.0 {
        return Err(CalcError::math("modulo par zéro"));
    }

    if let (Entier(x), Entier(y)) = (a, b) {
        if let Some(r) = x.checked_rem(y) {
            let r = if r != 0 && (r < 0) != (y < 0) { r + y } else { r };
            return Ok(Entier(r));
        }
        // i64::MIN % -1 : débordement => réel
    }

    let (x, y) = (a.as_f64(), b.as_f64());
    let mut r = x % y;
    if r != 0.0 && (r < 0.0) != (y < 0.0) {
        r += y;
    }
    Ok(Reel(r))
}

pub fn puissance(a: Nombre, b: Nombre) -> Resultat<Nombre> {
    if let (Entier(x), Entier(y)) = (a, b) {
        if y >= 0 {
            if let Some(p) = y.to_usize().and_then(|e| checked_pow(x, e)) {
                return Ok(Entier(p));
            }
            // débordement : on continue en réel
        }
    }

    let (x, y) = (a.as_f64(), b.as_f64());
    if x == 0.0 && y < 0.0 {
        return Err(CalcError::math("0 ne peut pas être élevé à une puissance négative"));
    }
    if x < 0.0 && y.is_finite() && y.fract() != 0.0 {
        return Err(CalcError::math("résultat complexe non supporté"));
    }

    let r = x.powf(y);
    if r.is_infinite() && x.is_finite() && y.is_finite() {
        return Err(CalcError::math("résultat hors limites"));
    }
    Ok(Reel(r))
}

pub fn oppose(a: Nombre) -> Nombre {
    match a {
        Entier(n) => n.checked_neg().map(Entier).unwrap_or(Reel(-(n as f64))),
        Reel(x) => Reel(-x),
    }
}
