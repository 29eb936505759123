//! Code states typed during the scripted demo, in order

pub const DEMO_CODE_STATES: &[&str] = &[
    "def calculate(x",
    "def calculate(x, y",
    "def calculate(x, y)",
    "def calculate(x, y):",
    "def calculate(x, y):\n    ",
    "def calculate(x, y):\n    return x / y",
    // type hints added
    "def calculate(x: int, y: int) -> int:\n    return x / y",
    "def calculate(x: int, y: int) -> int:\n    return x / y\n\ndef process(x):\n    return x - z",
    "def calculate(x: int, y: int) -> int:
    return x / y

def process(x):
    return x - z

def analyze(data):
    result = []
    for item in data:
        if item > 0:
            result.append(item * 2)
    return result",
];
