//! Propriétés (proptest) : déterminisme, absence de panique, arithmétique entière exacte.

use proptest::prelude::*;

use super::analyse::parse;
use super::nombre::Nombre;
use super::session::Session;

fn instantane(s: &Session) -> (Vec<String>, Vec<(String, String)>) {
    let h = s.history().iter().map(|e| format!("{} -> {}", e.texte, e.resultat)).collect();
    let v = s
        .variables()
        .iter()
        .map(|(n, v)| (n.to_string(), v.to_string()))
        .collect();
    (h, v)
}

/// Petites expressions bien formées (profondeur bornée).
fn expression() -> impl Strategy<Value = String> {
    let feuille = prop_oneof![
        (0i64..1000).prop_map(|n| n.to_string()),
        (0u32..100).prop_map(|n| format!("{}.25", n)),
        Just("pi".to_string()),
        Just("x".to_string()),
    ];
    feuille.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a} + {b})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a} - {b})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a} * {b})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a} / {b})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a} % {b})")),
            inner.clone().prop_map(|a| format!("-{a}")),
            inner.clone().prop_map(|a| format!("sqrt({a})")),
            inner.prop_map(|a| format!("floor({a})")),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_evaluation_deterministe(expr in expression()) {
        let mut s1 = Session::new();
        let mut s2 = Session::new();
        s1.evaluate("x = 7", false).unwrap();
        s2.evaluate("x = 7", false).unwrap();
        let r1 = s1.evaluate(&expr, true).map(|(v, t)| (v.to_string(), t));
        let r2 = s2.evaluate(&expr, true).map(|(v, t)| (v.to_string(), t));
        prop_assert_eq!(r1, r2);
    }

    #[test]
    fn prop_texte_quelconque_sans_panique(texte in "\\PC{0,40}", trace in any::<bool>()) {
        let mut s = Session::new();
        s.evaluate("a = 1", false).unwrap();
        let avant = instantane(&s);
        match s.evaluate(&texte, trace) {
            Ok(_) => prop_assert_eq!(s.history().len(), 2),
            Err(_) => prop_assert_eq!(instantane(&s), avant),
        }
    }

    #[test]
    fn prop_entiers_exacts(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
        let mut s = Session::new();
        let (somme, _) = s.evaluate(&format!("({a}) + ({b})"), false).unwrap();
        prop_assert!(matches!(somme, Nombre::Entier(v) if v == a + b));
        let (produit, _) = s.evaluate(&format!("({a}) * ({b})"), false).unwrap();
        prop_assert!(matches!(produit, Nombre::Entier(v) if v == a * b));
        let (diff, _) = s.evaluate(&format!("({a}) - ({b})"), false).unwrap();
        prop_assert_eq!(diff.to_string(), (a - b).to_string());
    }

    #[test]
    fn prop_modulo_signe_du_diviseur(a in -10_000i64..10_000, b in prop_oneof![-100i64..-1, 1i64..100]) {
        let mut s = Session::new();
        let (r, _) = s.evaluate(&format!("({a}) % ({b})"), false).unwrap();
        let r = match r {
            Nombre::Entier(r) => r,
            autre => return Err(TestCaseError::fail(format!("entier attendu, obtenu {autre}"))),
        };
        prop_assert!(r == 0 || (r < 0) == (b < 0));
        prop_assert!(r.abs() < b.abs());
        prop_assert_eq!(a, (a - r) / b * b + r);
    }

    #[test]
    fn prop_rendu_reanalysable(expr in expression()) {
        let premier = parse(&expr).unwrap();
        let rendu = premier.expr().to_string();
        let second = parse(&rendu).unwrap();
        prop_assert_eq!(premier, second);
    }
}
