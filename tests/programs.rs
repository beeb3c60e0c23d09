//! Whole programs run through the public entry points.

use pretty_assertions::assert_eq;
use tryeval::{EvalError, Evaluator, List, Node, Value, evaluate};

fn num(n: i64) -> Node {
    Node::new_number(n)
}

fn var(name: &str) -> Node {
    Node::new_var(name)
}

fn numbers(ns: &[i64]) -> Value {
    Value::List(ns.iter().copied().map(Value::Number).collect::<List>())
}

/// `let rec name param = body in scope`
fn letrec(name: &str, param: &str, body: Node, scope: Node) -> Node {
    Node::new_function_def(name, param, body, scope, true)
}

#[test]
fn arithmetic_condition_and_list_basics() {
    // (10 + 10) == 20
    assert_eq!(
        evaluate(&Node::new_eq(Node::new_add(num(10), num(10)), num(20))),
        Ok(Value::Bool(true))
    );
    // if (2 < 0) then 42 else 0
    assert_eq!(
        evaluate(&Node::new_if(Node::new_lt(num(2), num(0)), num(42), num(0))),
        Ok(Value::Number(0))
    );
    // isEmpty(nil)
    assert_eq!(
        evaluate(&Node::new_is_empty(Node::new_nil())),
        Ok(Value::Bool(true))
    );
    // isEmpty(0 :: nil)
    assert_eq!(
        evaluate(&Node::new_is_empty(Node::new_cons(num(0), Node::new_nil()))),
        Ok(Value::Bool(false))
    );
}

#[test]
fn sum_of_list() {
    // let rec sum l = if isEmpty l then 0 else hd l + sum (tl l) in sum [1..5]
    let program = letrec(
        "sum",
        "l",
        Node::new_if(
            Node::new_is_empty(var("l")),
            num(0),
            Node::new_add(
                Node::new_head(var("l")),
                Node::new_apply(var("sum"), Node::new_tail(var("l"))),
            ),
        ),
        Node::new_apply(
            var("sum"),
            Node::new_list(vec![num(1), num(2), num(3), num(4), num(5)]),
        ),
    );
    assert_eq!(evaluate(&program), Ok(Value::Number(15)));
}

#[test]
fn build_list_recursively() {
    // let rec range n = if n == 0 then nil else n :: range (n - 1) in range 4
    let program = letrec(
        "range",
        "n",
        Node::new_if(
            Node::new_eq(var("n"), num(0)),
            Node::new_nil(),
            Node::new_cons(
                var("n"),
                Node::new_apply(var("range"), Node::new_sub(var("n"), num(1))),
            ),
        ),
        Node::new_apply(var("range"), num(4)),
    );
    assert_eq!(evaluate(&program), Ok(numbers(&[4, 3, 2, 1])));
}

#[test]
fn curried_functions_and_map() {
    // let rec map f = \l. if isEmpty l then nil else f (hd l) :: map f (tl l)
    // in map (\x. x * x) [1, 2, 3]
    let program = letrec(
        "map",
        "f",
        Node::new_lambda(
            "l",
            Node::new_if(
                Node::new_is_empty(var("l")),
                Node::new_nil(),
                Node::new_cons(
                    Node::new_apply(var("f"), Node::new_head(var("l"))),
                    Node::new_apply(
                        Node::new_apply(var("map"), var("f")),
                        Node::new_tail(var("l")),
                    ),
                ),
            ),
        ),
        Node::new_apply(
            Node::new_apply(var("map"), Node::new_lambda("x", Node::new_mul(var("x"), var("x")))),
            Node::new_list(vec![num(1), num(2), num(3)]),
        ),
    );
    assert_eq!(evaluate(&program), Ok(numbers(&[1, 4, 9])));
}

#[test]
fn safe_head_with_try() {
    // let safeHead l = try hd l with -1 in safeHead nil + safeHead [5]
    let program = Node::new_function_def(
        "safeHead",
        "l",
        Node::new_try(Node::new_head(var("l")), num(-1)),
        Node::new_add(
            Node::new_apply(var("safeHead"), Node::new_nil()),
            Node::new_apply(var("safeHead"), Node::new_list(vec![num(5)])),
        ),
        false,
    );
    assert_eq!(evaluate(&program), Ok(Value::Number(4)));
}

#[test]
fn raise_unwinds_through_recursion() {
    // let rec last l = if isEmpty (tl l) then hd l else last (tl l)
    // in try last nil with 0
    let program = letrec(
        "last",
        "l",
        Node::new_if(
            Node::new_is_empty(Node::new_tail(var("l"))),
            Node::new_head(var("l")),
            Node::new_apply(var("last"), Node::new_tail(var("l"))),
        ),
        Node::new_try(Node::new_apply(var("last"), Node::new_nil()), num(0)),
    );
    assert_eq!(evaluate(&program), Ok(Value::Number(0)));
}

#[test]
fn uncaught_raise_is_the_result() {
    let program = Node::new_add(num(1), Node::new_head(Node::new_nil()));
    let result = evaluate(&program);
    assert_eq!(result, Ok(Value::Raise));
    assert_eq!(result.map(|v| v.to_string()), Ok("raise".to_string()));
}

#[test]
fn shared_tail_is_not_mutated() {
    // let t = [2, 3] in (1 :: t, 9 :: t, t) observed through three separate heads
    let with_t = |body: Node| {
        Node::new_apply(
            Node::new_lambda("t", body),
            Node::new_list(vec![num(2), num(3)]),
        )
    };
    let program = with_t(Node::new_list(vec![
        Node::new_cons(num(1), var("t")),
        Node::new_cons(num(9), var("t")),
        var("t"),
    ]));
    let expected: List = [numbers(&[1, 2, 3]), numbers(&[9, 2, 3]), numbers(&[2, 3])]
        .into_iter()
        .collect();
    assert_eq!(evaluate(&program), Ok(Value::List(expected)));
}

#[test]
fn deep_recursion_with_depth_limit() {
    // let rec down n = if n == 0 then 0 else down (n - 1) in down 50
    let program = letrec(
        "down",
        "n",
        Node::new_if(
            Node::new_eq(var("n"), num(0)),
            num(0),
            Node::new_apply(var("down"), Node::new_sub(var("n"), num(1))),
        ),
        Node::new_apply(var("down"), num(50)),
    );
    assert_eq!(
        Evaluator::with_max_depth(100).evaluate(&program),
        Ok(Value::Number(0))
    );
    assert!(matches!(
        Evaluator::with_max_depth(10).evaluate(&program),
        Err(EvalError::DepthLimitExceeded { limit: 10, .. })
    ));
}

#[test]
fn fault_message_names_operator_and_kind() {
    let program = Node::new_is_empty(num(3));
    match evaluate(&program) {
        Err(err) => assert_eq!(
            err.to_string(),
            "Type fault at 0..0: 'isEmpty' expects a list as its operand, got a number"
        ),
        Ok(value) => panic!("expected a fault, got {}", value),
    }
}
