//! Tests scientifiques (campagne) : comportements observables de la session.
//!
//! Notes :
//! - Les résultats sont comparés numériquement (5 == 5.0) sauf quand le type
//!   (entier / réel) fait partie du contrat d’affichage ; on compare alors le texte.
//! - Undo supprime la variable affectée sans restaurer l’ancienne valeur :
//!   c’est le comportement attendu, pas un oubli.

use pretty_assertions::assert_eq;

use super::erreur::CalcError;
use super::nombre::Nombre;
use super::session::Session;

fn eval_ok(s: &mut Session, expr: &str) -> Nombre {
    s.evaluate(expr, false)
        .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
        .0
}

fn texte(expr: &str) -> String {
    eval_ok(&mut Session::new(), expr).to_string()
}

fn assert_proche(expr: &str, attendu: f64) {
    let v = eval_ok(&mut Session::new(), expr).as_f64();
    assert!(
        (v - attendu).abs() <= 1e-6 * attendu.abs().max(1.0),
        "expr={expr:?} v={v} attendu={attendu}"
    );
}

fn assert_err(expr: &str) -> CalcError {
    let mut s = Session::new();
    match s.evaluate(expr, false) {
        Ok((v, _)) => panic!("attendu une erreur pour {expr:?}, obtenu {v}"),
        Err(e) => e,
    }
}

/* ------------------------ Arithmétique de base ------------------------ */

#[test]
fn sci_arithmetique_de_base() {
    let mut s = Session::new();
    assert_eq!(eval_ok(&mut s, "2+3"), 5);
    assert_eq!(eval_ok(&mut s, "10 - 4"), 6);
    assert_eq!(eval_ok(&mut s, "2*3 + 1"), 7);
    assert_eq!(eval_ok(&mut s, "2**3"), 8);
    assert_eq!(eval_ok(&mut s, "10 % 3"), 1);
}

#[test]
fn sci_precedence_et_associativite() {
    assert_eq!(texte("-2**2"), "-4");
    assert_eq!(texte("(-2)**2"), "4");
    assert_eq!(texte("2**3**2"), "512");
    assert_eq!(texte("2**-1"), "0.5");
    assert_eq!(texte("100/10/5"), "2.0");
    assert_eq!(texte("2 - 3 - 4"), "-5");
    assert_eq!(texte("-3 % 5"), "2");
    assert_eq!(texte("2 * -3"), "-6");
    assert_eq!(texte("--3"), "3");
    assert_eq!(texte("+(1+1)"), "2");
}

#[test]
fn sci_entier_versus_reel() {
    assert_eq!(texte("2+3"), "5");
    assert_eq!(texte("4/2"), "2.0");
    assert_eq!(texte("2.0 + 3"), "5.0");
    assert_eq!(texte("0.1 + 0.2"), "0.30000000000000004");
    assert_eq!(texte("7.5 % 2"), "1.5");
    assert_eq!(texte("2**62 * 4"), "1.8446744073709552e19");
    assert_eq!(texte("1e3"), "1000.0");
}

/* ------------------------ Fonctions et constantes ------------------------ */

#[test]
fn sci_fonctions_et_constantes() {
    assert_proche("sin(pi/2)", 1.0);
    assert_proche("cos(0)", 1.0);
    assert_proche("tan(pi/4)", 1.0);
    assert_proche("log(e)", 1.0);
    assert_proche("log(8, 2)", 3.0);
    assert_proche("log10(1000)", 3.0);
    assert_proche("exp(1)", std::f64::consts::E);
    assert_eq!(eval_ok(&mut Session::new(), "sqrt(16)"), 4);
    assert_eq!(texte("sqrt(16)"), "4.0");
    assert_eq!(texte("factorial(5)"), "120");
    assert_eq!(texte("floor(2.7)"), "2");
    assert_eq!(texte("ceil(2.1)"), "3");
    assert_eq!(texte("floor(-2.5)"), "-3");
    assert_eq!(texte("fabs(-3)"), "3.0");
    assert_eq!(texte("√(9) + π*0"), "3.0");
}

#[test]
fn sci_erreurs_de_domaine() {
    for expr in ["sqrt(-1)", "log(0)", "log(-2)", "log10(0)", "factorial(-1)", "factorial(2.5)", "1/0", "5 % 0", "0**-1", "exp(1000)", "(-8)**(1/3)", "10.0**400"] {
        assert!(
            matches!(assert_err(expr), CalcError::Math(_)),
            "expr={expr:?}"
        );
    }
    assert!(matches!(assert_err("sqrt()"), CalcError::Arity { recu: 0, .. }));
    assert!(matches!(assert_err("log(1, 2, 3)"), CalcError::Arity { recu: 3, .. }));
}

/* ------------------------ Sécurité (liste blanche) ------------------------ */

#[test]
fn sci_securite_liste_blanche() {
    assert!(matches!(assert_err("import os"), CalcError::SyntaxError(_)));
    assert!(matches!(assert_err("__import__('os')"), CalcError::SyntaxError(_)));
    assert_eq!(assert_err("__import__(os)"), CalcError::FunctionNotAllowed("__import__".into()));
    assert_eq!(assert_err("eval(1)"), CalcError::FunctionNotAllowed("eval".into()));
    assert_eq!(assert_err("os"), CalcError::UnknownIdentifier("os".into()));
    assert_eq!(assert_err("(1+1)(2)"), CalcError::OnlySimpleCallsAllowed);
    assert_eq!(assert_err("7 // 2"), CalcError::UnsupportedOperator);
    assert_eq!(assert_err("~7"), CalcError::UnsupportedUnaryOperator);
    for expr in ["1 < 2", "a.b", "x[0]", "'a'", "1; 2", "lambda: 0", "not 1", "1 and 2"] {
        assert!(
            matches!(assert_err(expr), CalcError::SyntaxError(_)),
            "expr={expr:?}"
        );
    }
}

/* ------------------------ Session ------------------------ */

#[test]
fn sci_affectation_aller_retour() {
    let mut s = Session::new();
    assert_eq!(eval_ok(&mut s, "a = 5"), 5);
    assert_eq!(s.variables().get("a"), Some(Nombre::Entier(5)));
    assert_eq!(eval_ok(&mut s, "b = a * 2"), 10);
    s.undo().unwrap();
    assert!(!s.variables().contains("b"));
    assert_eq!(s.history().len(), 1);
}

#[test]
fn sci_historique_monotone() {
    let mut s = Session::new();
    eval_ok(&mut s, "1+1");
    eval_ok(&mut s, "x=3");
    assert_eq!(s.history().len(), 2);

    let _ = s.evaluate("1/0", false);
    assert_eq!(s.history().len(), 2);

    s.undo().unwrap();
    assert_eq!(s.history().len(), 1);
    assert!(!s.variables().contains("x"));

    s.clear();
    s.clear();
    assert!(s.history().is_empty());
    assert_eq!(s.undo(), Err(CalcError::NothingToUndo));
}

#[test]
fn sci_trace_complete() {
    let mut s = Session::new();
    let (v, trace) = s.evaluate("2+3*4", true).unwrap();
    assert_eq!(v, 14);
    assert!(trace.iter().any(|t| t.contains("Mult")));
    assert!(trace.iter().any(|t| t.contains("Add")));
    let (_, trace) = s.evaluate("2+3*4", false).unwrap();
    assert!(trace.is_empty());
}

#[test]
fn sci_variables_masquent_constantes() {
    let mut s = Session::new();
    eval_ok(&mut s, "pi = 3");
    assert_eq!(eval_ok(&mut s, "pi * 2"), 6);
    s.undo().unwrap();
    s.undo().unwrap();
    assert_eq!(eval_ok(&mut s, "pi"), std::f64::consts::PI);
    // un nom de fonction peut servir de variable ; l’appel reste la fonction
    eval_ok(&mut s, "sin = 2");
    assert_eq!(eval_ok(&mut s, "sin(0) + sin"), 2);
}

#[test]
fn sci_longues_chaines_plates() {
    let mut s = Session::new();
    assert_eq!(texte(&vec!["1"; 500].join("+")), "500");
    assert_eq!(eval_ok(&mut s, &vec!["2"; 201].join("*")), 2f64.powi(201));

    // l’imbrication réelle reste refusée
    let profond = format!("{}1{}", "sin(".repeat(5000), ")".repeat(5000));
    assert!(matches!(s.evaluate(&profond, false), Err(CalcError::SyntaxError(_))));
    assert_eq!(s.history().len(), 1);
}
