//! Built-in starter projects

/// A named `{html, css, js}` starter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub html: &'static str,
    pub css: &'static str,
    pub js: &'static str,
}

const BASIC_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>My Page</title>
</head>
<body>
    <header>
        <h1>Welcome</h1>
    </header>
    <main>
        <p>Add your content here.</p>
    </main>
    <footer>
        <p>&copy; 2024</p>
    </footer>
</body>
</html>"#;

const BASIC_CSS: &str = r#"* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: Arial, sans-serif;
    line-height: 1.6;
}

header {
    background: #333;
    color: #fff;
    padding: 1rem;
    text-align: center;
}

main {
    padding: 2rem;
}

footer {
    background: #333;
    color: #fff;
    text-align: center;
    padding: 1rem;
    position: fixed;
    bottom: 0;
    width: 100%;
}"#;

const FLEXBOX_HTML: &str = r#"<div class="container">
    <div class="box">Box 1</div>
    <div class="box">Box 2</div>
    <div class="box">Box 3</div>
</div>"#;

const FLEXBOX_CSS: &str = r#".container {
    display: flex;
    justify-content: space-around;
    align-items: center;
    height: 100vh;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
}

.box {
    width: 200px;
    height: 200px;
    background: white;
    border-radius: 10px;
    display: flex;
    justify-content: center;
    align-items: center;
    font-size: 24px;
    font-weight: bold;
    box-shadow: 0 10px 30px rgba(0,0,0,0.3);
    transition: transform 0.3s;
}

.box:hover {
    transform: translateY(-10px);
}"#;

const GRID_HTML: &str = r#"<div class="grid-container">
    <div class="item">1</div>
    <div class="item">2</div>
    <div class="item">3</div>
    <div class="item">4</div>
    <div class="item">5</div>
    <div class="item">6</div>
</div>"#;

const GRID_CSS: &str = r#"body {
    margin: 0;
    padding: 20px;
    background: #f0f0f0;
}

.grid-container {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
    gap: 20px;
}

.item {
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    color: white;
    padding: 40px;
    text-align: center;
    font-size: 32px;
    font-weight: bold;
    border-radius: 10px;
    box-shadow: 0 5px 15px rgba(0,0,0,0.2);
    transition: transform 0.3s;
}

.item:hover {
    transform: scale(1.05);
}"#;

const ANIMATION_HTML: &str = r#"<div class="animation-container">
    <div class="circle"></div>
    <h1 class="title">CSS Animation</h1>
</div>"#;

const ANIMATION_CSS: &str = r#"body {
    margin: 0;
    height: 100vh;
    display: flex;
    justify-content: center;
    align-items: center;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
}

.animation-container {
    text-align: center;
}

.circle {
    width: 100px;
    height: 100px;
    background: white;
    border-radius: 50%;
    margin: 0 auto 30px;
    animation: bounce 2s infinite;
}

@keyframes bounce {
    0%, 100% { transform: translateY(0); }
    50% { transform: translateY(-30px); }
}

.title {
    color: white;
    font-size: 48px;
    animation: fadeIn 2s;
}

@keyframes fadeIn {
    from { opacity: 0; transform: translateY(20px); }
    to { opacity: 1; transform: translateY(0); }
}"#;

const INTERACTIVE_HTML: &str = r#"<div class="app">
    <h1>Counter</h1>
    <div class="counter">
        <button id="decrease">-</button>
        <span id="count">0</span>
        <button id="increase">+</button>
    </div>
    <button id="reset">Reset</button>
</div>"#;

const INTERACTIVE_CSS: &str = r#"body {
    margin: 0;
    height: 100vh;
    display: flex;
    justify-content: center;
    align-items: center;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    font-family: Arial, sans-serif;
}

.app {
    background: white;
    padding: 40px;
    border-radius: 20px;
    box-shadow: 0 20px 60px rgba(0,0,0,0.3);
    text-align: center;
}

.counter {
    display: flex;
    gap: 20px;
    align-items: center;
    margin: 30px 0;
}

button {
    padding: 15px 30px;
    font-size: 24px;
    border: none;
    border-radius: 10px;
    cursor: pointer;
    background: #667eea;
    color: white;
    transition: background 0.3s;
}

button:hover {
    background: #764ba2;
}

#count {
    font-size: 48px;
    font-weight: bold;
    min-width: 100px;
}

#reset {
    margin-top: 20px;
    background: #f44336;
}

#reset:hover {
    background: #d32f2f;
}"#;

const INTERACTIVE_JS: &str = r#"let count = 0;
const countElement = document.getElementById('count');

document.getElementById('increase').addEventListener('click', () => {
    count++;
    countElement.textContent = count;
});

document.getElementById('decrease').addEventListener('click', () => {
    count--;
    countElement.textContent = count;
});

document.getElementById('reset').addEventListener('click', () => {
    count = 0;
    countElement.textContent = count;
});

console.log('Interactive app started');"#;

const TEMPLATES: &[Template] = &[
    Template {
        id: "blank",
        name: "Blank",
        html: "",
        css: "",
        js: "",
    },
    Template {
        id: "basic",
        name: "Basic HTML",
        html: BASIC_HTML,
        css: BASIC_CSS,
        js: "console.log('Page loaded');",
    },
    Template {
        id: "flexbox",
        name: "Flexbox Layout",
        html: FLEXBOX_HTML,
        css: FLEXBOX_CSS,
        js: "console.log('Flexbox layout demo');",
    },
    Template {
        id: "grid",
        name: "CSS Grid",
        html: GRID_HTML,
        css: GRID_CSS,
        js: "console.log('CSS Grid layout demo');",
    },
    Template {
        id: "animation",
        name: "CSS Animation",
        html: ANIMATION_HTML,
        css: ANIMATION_CSS,
        js: "console.log('Animation running');",
    },
    Template {
        id: "interactive",
        name: "Interactive",
        html: INTERACTIVE_HTML,
        css: INTERACTIVE_CSS,
        js: INTERACTIVE_JS,
    },
];

impl Template {
    pub fn all() -> &'static [Template] {
        TEMPLATES
    }

    pub fn find(id: &str) -> Option<&'static Template> {
        TEMPLATES.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<_> = Template::all().iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), Template::all().len());
    }

    #[test]
    fn test_find() {
        assert_eq!(Template::find("blank").map(|t| t.html), Some(""));
        assert!(Template::find("interactive").unwrap().js.contains("getElementById('count')"));
        assert!(Template::find("missing").is_none());
    }
}
