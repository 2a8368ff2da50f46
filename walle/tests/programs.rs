use walle::{Color, Config, DiagnosticKind, ExecutionResult, Interpreter};

fn run(source: &str) -> (Interpreter, ExecutionResult) {
    let mut interpreter = Interpreter::new(Config::default().with_canvas_size(10)).unwrap();
    let result = interpreter.execute(source);
    (interpreter, result)
}

fn kinds(result: &ExecutionResult) -> Vec<(usize, DiagnosticKind)> {
    result.diagnostics.iter().map(|d| (d.line, d.kind)).collect()
}

#[test]
fn spawn_places_the_agent() {
    let (interpreter, result) = run("Spawn(3, 7)");
    assert!(result.success, "{:?}", result.diagnostics);
    assert_eq!((interpreter.agent().x(), interpreter.agent().y()), (3, 7));
    assert_eq!(interpreter.snapshot().count(Color::White), 100);
}

#[test]
fn spawn_outside_the_canvas_is_rejected() {
    let (interpreter, result) = run("Spawn(10, 0)");
    assert!(!result.success);
    assert_eq!(
        kinds(&result),
        vec![(1, DiagnosticKind::Semantic), (1, DiagnosticKind::Runtime)]
    );
    assert!(!interpreter.agent().is_spawned());
}

#[test]
fn spawn_with_missing_argument_reports_once() {
    let (interpreter, result) = run("Spawn(1)");
    assert_eq!(kinds(&result), vec![(1, DiagnosticKind::Syntactic)]);
    assert_eq!(interpreter.snapshot().count(Color::White), 100);
}

#[test]
fn draw_line_paints_distance_cells() {
    let (interpreter, result) = run(
        "Spawn(0, 0)\n\
         DrawLine(1, 0, 5)\n\
         n <- GetColorCount(\"Black\", 1, 0, 5, 0)",
    );
    assert!(result.success, "{:?}", result.diagnostics);
    assert_eq!(interpreter.variables().get_int("n"), Ok(5));
    assert_eq!(interpreter.snapshot().count(Color::Black), 5);
    assert_eq!(interpreter.snapshot().get(0, 0), Some(Color::White));
    assert_eq!((interpreter.agent().x(), interpreter.agent().y()), (5, 0));
}

#[test]
fn fill_twice_is_the_same_as_once() {
    let source = "Spawn(4, 4)\nColor(\"Blue\")\nDrawLine(0, 1, 3)\nColor(\"Red\")\nFill()";
    let (once, _) = run(source);
    let (twice, result) = run(&format!("{source}\nFill()"));
    assert!(result.success, "{:?}", result.diagnostics);
    assert_eq!(once.snapshot(), twice.snapshot());
    assert_eq!(twice.snapshot().count(Color::Blue), 0);
}

#[test]
fn fill_stops_at_other_colors() {
    let (interpreter, result) = run(
        "Spawn(0, 5)\n\
         DrawLine(1, 0, 9)\n\
         DrawLine(-1, 0, 9)\n\
         Spawn(0, 0)\n\
         Color(\"Green\")\n\
         Fill()",
    );
    assert!(result.success, "{:?}", result.diagnostics);
    let snapshot = interpreter.snapshot();
    assert_eq!(snapshot.get(0, 5), Some(Color::Black));
    assert_eq!(snapshot.get(3, 9), Some(Color::White));
    assert_eq!(snapshot.count(Color::Black), 10);
    assert_eq!(snapshot.count(Color::Green), 50);
}

#[test]
fn variables_round_trip_integers() {
    let (interpreter, result) = run("a <- 41\nb <- a + 1\nc <- -b\nd <- (b * 2) / 4 % 5");
    assert!(result.success, "{:?}", result.diagnostics);
    let vars = interpreter.variables();
    assert_eq!(vars.get_int("b"), Ok(42));
    assert_eq!(vars.get_int("c"), Ok(-42));
    assert_eq!(vars.get_int("d"), Ok(21 % 5));
}

#[test]
fn boolean_assignments() {
    let (interpreter, result) = run("a <- 3 > 2\nb <- a && 1 == 2\nc <- b || true");
    assert!(result.success, "{:?}", result.diagnostics);
    let vars = interpreter.variables();
    assert_eq!(vars.get_bool("a"), Ok(true));
    assert_eq!(vars.get_bool("b"), Ok(false));
    assert_eq!(vars.get_bool("c"), Ok(true));
}

#[test]
fn goto_loops_until_the_condition_fails() {
    let (interpreter, result) = run("x <- 0\ntop\nx <- x + 1\nGoTo [top] (x < 3)");
    assert!(result.success, "{:?}", result.diagnostics);
    assert_eq!(interpreter.variables().get_int("x"), Ok(3));
    assert_eq!(result.steps, 7);
}

#[test]
fn loops_can_draw() {
    let (interpreter, result) = run(
        "Spawn(0, 0)\n\
         i <- 0\n\
         step:\n\
         DrawLine(1, 1, 1)\n\
         i <- i + 1\n\
         GoTo [step] (i < 9)",
    );
    assert!(result.success, "{:?}", result.diagnostics);
    let snapshot = interpreter.snapshot();
    assert_eq!(snapshot.count(Color::Black), 9);
    assert_eq!(snapshot.get(9, 9), Some(Color::Black));
}

#[test]
fn circle_is_drawn_around_the_target_point() {
    let (interpreter, result) = run(
        "Spawn(2, 0)\n\
         Color(\"Red\")\n\
         DrawCircle(0, 1, 2)\n\
         GetColorCount(\"Red\", 0, 0, 4, 4)",
    );
    assert!(result.success, "{:?}", result.diagnostics);
    assert_eq!(result.last_value, Some(12));
    assert_eq!(interpreter.snapshot().count(Color::Red), 12);
    assert_eq!((interpreter.agent().x(), interpreter.agent().y()), (2, 2));
}

#[test]
fn rectangle_outline() {
    let (interpreter, result) = run(
        "Spawn(1, 4)\n\
         Color(\"Purple\")\n\
         DrawRectangle(1, 0, 3, 4, 2)",
    );
    assert!(result.success, "{:?}", result.diagnostics);
    let snapshot = interpreter.snapshot();
    // 5 x 3 outline around (4, 4).
    assert_eq!(snapshot.count(Color::Purple), 12);
    assert_eq!(snapshot.get(3, 4), Some(Color::White));
    assert_eq!(snapshot.get(4, 4), Some(Color::White));
    assert_eq!(snapshot.get(2, 3), Some(Color::Purple));
    assert_eq!((interpreter.agent().x(), interpreter.agent().y()), (4, 4));
}

#[test]
fn transparent_brush_paints_nothing() {
    let (interpreter, result) = run("Spawn(0, 0)\nColor(\"Transparent\")\nDrawLine(1, 1, 4)");
    assert!(result.success, "{:?}", result.diagnostics);
    assert_eq!(interpreter.snapshot().count(Color::White), 100);
    assert_eq!(interpreter.agent().x(), 4);
}

#[test]
fn brush_size_widens_strokes() {
    let (interpreter, result) = run("Spawn(0, 5)\nSize(4)\nDrawLine(1, 0, 3)");
    assert!(result.success, "{:?}", result.diagnostics);
    assert_eq!(interpreter.agent().brush_size(), 3);
    assert_eq!(interpreter.snapshot().count(Color::Black), 15);
}

#[test]
fn queries_read_agent_state() {
    let (interpreter, result) = run(
        "Spawn(2, 3)\n\
         Color(\"Red\")\n\
         x <- GetActualX()\n\
         y <- GetActualY()\n\
         n <- GetCanvasSize()\n\
         red <- IsBrushColor(\"Red\")\n\
         blue <- IsBrushColor(\"Blue\")\n\
         size <- IsBrushSize(1)\n\
         below <- IsCanvasColor(\"White\", 1, 0)",
    );
    assert!(result.success, "{:?}", result.diagnostics);
    let vars = interpreter.variables();
    assert_eq!(vars.get_int("x"), Ok(2));
    assert_eq!(vars.get_int("y"), Ok(3));
    assert_eq!(vars.get_int("n"), Ok(10));
    assert_eq!(vars.get_int("red"), Ok(1));
    assert_eq!(vars.get_int("blue"), Ok(0));
    assert_eq!(vars.get_int("size"), Ok(1));
    assert_eq!(vars.get_int("below"), Ok(1));
}

#[test]
fn drawing_before_spawn_is_a_runtime_error() {
    let (_, result) = run("DrawLine(1, 0, 2)\nSpawn(0, 0)");
    assert_eq!(kinds(&result), vec![(1, DiagnosticKind::Runtime)]);
}

#[test]
fn errors_do_not_stop_execution() {
    let (interpreter, result) = run(
        "Spawn(0, 0)\n\
         Color(\"Mauve\")\n\
         x <- y + 1\n\
         Jump around\n\
         Size(0)\n\
         done <- 1",
    );
    assert_eq!(
        kinds(&result),
        vec![
            (2, DiagnosticKind::Semantic),
            (3, DiagnosticKind::Runtime),
            (4, DiagnosticKind::Syntactic),
            (5, DiagnosticKind::Runtime),
        ]
    );
    assert_eq!(interpreter.variables().get_int("done"), Ok(1));
    assert_eq!(interpreter.agent().color(), Color::Black);
}

#[test]
fn duplicate_labels_and_unknown_targets() {
    let (_, result) = run("again\nagain\nGoTo [elsewhere] (1)");
    assert_eq!(
        kinds(&result),
        vec![(2, DiagnosticKind::Semantic), (3, DiagnosticKind::Semantic)]
    );
}

#[test]
fn step_limit_halts_runaway_programs() {
    let mut interpreter =
        Interpreter::new(Config::default().with_canvas_size(10).with_max_steps(100)).unwrap();
    let result = interpreter.execute("i <- 0\nspin\ni <- i + 1\nGoTo [spin] (true)");
    assert!(!result.success);
    assert_eq!(result.steps, 100);
    assert_eq!(kinds(&result), vec![(4, DiagnosticKind::Runtime)]);
    assert_eq!(interpreter.variables().get_int("i"), Ok(50));
}

#[test]
fn empty_program() {
    let (_, result) = run("");
    assert!(!result.success);
    assert_eq!(kinds(&result), vec![(1, DiagnosticKind::Syntactic)]);
}

#[test]
fn check_reports_without_running() {
    let diagnostics = walle::check(
        "Spawn(0, 0)\nDrawLine(1, 0)\nGoTo [x] (1)\nx:",
        &Config::default().with_canvas_size(10),
    )
    .unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].line, 2);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::Syntactic);
}

#[test]
fn arithmetic_precedence_and_truncation() {
    let (interpreter, result) = run(
        "a <- 3 + 4 * 2\n\
         b <- (3 + 4) * 2\n\
         c <- 7 / 2\n\
         d <- 7 % 2\n\
         e <- 2 ** 3",
    );
    assert!(result.success, "{:?}", result.diagnostics);
    let vars = interpreter.variables();
    assert_eq!(vars.get_int("a"), Ok(11));
    assert_eq!(vars.get_int("b"), Ok(14));
    assert_eq!(vars.get_int("c"), Ok(3));
    assert_eq!(vars.get_int("d"), Ok(1));
    assert_eq!(vars.get_int("e"), Ok(8));
}

#[test]
fn colon_labels_jump_a_bounded_number_of_times() {
    let (interpreter, result) = run("x <- 0\ntop:\nx <- x + 1\nGoTo [top] (x < 3)");
    assert!(result.success, "{:?}", result.diagnostics);
    assert_eq!(interpreter.variables().get_int("x"), Ok(3));
}

#[test]
fn circle_in_place_with_zero_direction() {
    let (interpreter, result) = run(
        "Spawn(2, 2)\n\
         Color(\"Red\")\n\
         DrawCircle(0, 0, 2)\n\
         n <- GetColorCount(\"Red\", 0, 0, 4, 4)",
    );
    assert!(result.success, "{:?}", result.diagnostics);
    assert_eq!(interpreter.variables().get_int("n"), Ok(12));
    assert_eq!(interpreter.snapshot().get(2, 2), Some(Color::White));
    assert_eq!((interpreter.agent().x(), interpreter.agent().y()), (2, 2));
}

#[test]
fn nested_queries_with_several_arguments() {
    let (interpreter, result) = run(
        "Spawn(0, 0)\n\
         DrawLine(1, 0, IsCanvasColor(\"White\", 0, 1))\n\
         Spawn(GetColorCount(\"Black\", 0, 0, 9, 9), 5)",
    );
    assert!(result.success, "{:?}", result.diagnostics);
    assert_eq!(interpreter.snapshot().get(1, 0), Some(Color::Black));
    assert_eq!((interpreter.agent().x(), interpreter.agent().y()), (1, 5));
}

#[test]
fn circle_past_the_integer_range_is_a_runtime_error() {
    let (interpreter, result) = run("Spawn(5, 5)\nDrawCircle(1, 0, 9223372036854775807)");
    assert!(!result.success);
    assert_eq!(kinds(&result), vec![(2, DiagnosticKind::Runtime)]);
    assert_eq!(interpreter.snapshot().count(Color::White), 100);
    assert_eq!((interpreter.agent().x(), interpreter.agent().y()), (5, 5));
}

#[test]
fn huge_brushes_and_shapes_finish() {
    let (interpreter, result) = run("Spawn(5, 5)\nSize(2000001)\nDrawLine(1, 0, 1)");
    assert!(result.success, "{:?}", result.diagnostics);
    assert_eq!(interpreter.snapshot().count(Color::Black), 100);

    let (interpreter, result) = run("Spawn(5, 5)\nDrawRectangle(1, 0, 0, 100000000000, 2)");
    assert!(result.success, "{:?}", result.diagnostics);
    assert_eq!(interpreter.snapshot().count(Color::Black), 20);
    assert_eq!(interpreter.snapshot().get(5, 5), Some(Color::White));
}

#[test]
fn long_sums_are_not_too_deep() {
    let source = format!("x <- {}", vec!["1"; 300].join(" + "));
    let (interpreter, result) = run(&source);
    assert!(result.success, "{:?}", result.diagnostics);
    assert_eq!(interpreter.variables().get_int("x"), Ok(300));
}
