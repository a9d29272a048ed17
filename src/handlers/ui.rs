use axum::{
    response::Html,
    routing::get,
    Router,
};

pub fn ui_routes() -> Router {
    Router::new()
        .route("/", get(studio_page))
}

/// Single-page studio. All state lives server-side; the page renders `/api/state`.
pub async fn studio_page() -> Html<&'static str> {
    Html(STUDIO_HTML)
}

const STUDIO_HTML: &str = r###"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>AI Ad Studio</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; display: flex; color: #222; }
        aside { width: 280px; padding: 20px; background: #f4f6f8; min-height: 100vh; box-sizing: border-box; }
        aside label { display: block; margin-top: 10px; font-size: 13px; }
        aside input, aside select { width: 100%; padding: 6px; box-sizing: border-box; }
        main { flex: 1; padding: 20px; }
        .header { padding: 20px; border-radius: 14px; background: linear-gradient(90deg,#0f2027,#203a43,#2c5364); color: white; }
        .header h1 { margin-bottom: 0; }
        .grid { display: flex; gap: 12px; flex-wrap: wrap; }
        .tile { flex: 1; min-width: 180px; }
        .tile img, .tile video { width: 100%; border-radius: 8px; }
        .warning { background: #fff3cd; border: 1px solid #ffeaa7; padding: 8px; border-radius: 5px; }
        .error { background: #f8d7da; border: 1px solid #f5c2c7; padding: 8px; border-radius: 5px; }
        .progress { height: 10px; background: #e9ecef; border-radius: 5px; overflow: hidden; }
        .progress div { height: 100%; background: #2c5364; width: 0; transition: width .3s; }
        button { margin-top: 10px; padding: 8px 14px; }
        button:disabled { opacity: .5; }
        .caption { font-size: 12px; color: #6c757d; }
    </style>
</head>
<body>
<aside>
    <h3>Campaign Settings</h3>
    <label>Business type <select id="business_type"></select></label>
    <label>Theme <select id="campaign_theme"></select></label>
    <label>Number of scenes <span id="num_scenes_value"></span>
        <input id="num_scenes" type="range" min="1"></label>
    <label>Character age <input id="character_age"></label>
    <label>Gender <select id="character_gender"></select></label>
    <label>Ethnicity <input id="character_ethnicity"></label>
    <hr>
    <h3>Business Info</h3>
    <label>Business name <input id="business_name"></label>
    <label>Phone <input id="phone_number"></label>
    <label>Website <input id="website"></label>
</aside>
<main>
    <div class="header">
        <h1>AI Ad Studio</h1>
        <p>Generate professional AI video ads with character consistency, voiceover &amp; music</p>
    </div>

    <div id="progress-box" hidden>
        <p id="progress-label"></p>
        <div class="progress"><div id="progress-bar"></div></div>
    </div>
    <div id="error" class="error" hidden></div>

    <h2>Step 1 - Generate Campaign Images</h2>
    <button id="generate-campaign">Generate Campaign</button>
    <div id="images"></div>

    <h2>Step 2 - Generate Videos</h2>
    <label>Campaign ID <input id="campaign_id"></label>
    <button id="generate-videos">Generate Videos</button>
    <div id="videos"></div>
</main>
<script>
const $ = (id) => document.getElementById(id);
let idEdited = false;

function fillSelect(id, values, selected) {
    $(id).replaceChildren(...values.map(v => el('option', { textContent: v, selected: v === selected })));
}

async function loadForm() {
    const form = await (await fetch('/api/form')).json();
    fillSelect('business_type', form.choices.business_types, form.campaign.business_type);
    fillSelect('campaign_theme', form.choices.campaign_themes, form.campaign.campaign_theme);
    fillSelect('character_gender', form.choices.character_genders, form.campaign.character_gender);
    $('num_scenes').max = form.choices.max_scenes;
    $('num_scenes').value = form.campaign.num_scenes;
    $('num_scenes_value').textContent = form.campaign.num_scenes;
    for (const key of ['character_age', 'character_ethnicity']) $(key).value = form.campaign[key];
    for (const key of ['business_name', 'phone_number', 'website']) $(key).value = form.video[key];
}

function el(tag, props = {}, children = []) {
    const node = document.createElement(tag);
    Object.assign(node, props);
    node.append(...children);
    return node;
}

function warningBox(text) {
    return el('div', { className: 'warning', textContent: text });
}

function showError(message) {
    $('error').hidden = !message;
    $('error').textContent = message || '';
}

function render(plan) {
    $('generate-campaign').disabled = plan.busy;
    $('generate-videos').disabled = plan.busy;
    showError(plan.error);
    if (!idEdited) $('campaign_id').value = plan.campaign_id;

    const images = [];
    if (plan.images) {
        images.push(el('h3', { textContent: 'Generated Images' }));
        if (plan.images.warning) images.push(warningBox(plan.images.warning));
        images.push(el('div', { className: 'grid' }, plan.images.tiles.map(t => el('div', { className: 'tile' }, [
            t.image_url ? el('img', { src: t.image_url }) : warningBox(t.warning),
            el('div', { className: 'caption', textContent: t.caption }),
        ]))));
    }
    $('images').replaceChildren(...images);

    const videos = [];
    if (plan.videos && plan.videos.kind === 'merged') {
        videos.push(
            el('h3', { textContent: 'Final AI Advertisement' }),
            el('video', { controls: true, src: plan.videos.url }),
            el('p', {}, [el('a', { href: plan.videos.download_path, textContent: 'Download Final Ad' })]),
        );
    } else if (plan.videos) {
        videos.push(
            el('h3', { textContent: 'Scene Videos' }),
            el('div', { className: 'grid' }, plan.videos.videos.map(v => el('div', { className: 'tile' }, [
                el('video', { controls: true, src: v.url }),
                el('div', { className: 'caption', textContent: v.caption }),
            ]))),
        );
    }
    $('videos').replaceChildren(...videos);
}

async function refresh() {
    try {
        render(await (await fetch('/api/state')).json());
    } catch (e) {
        $('generate-campaign').disabled = false;
        $('generate-videos').disabled = false;
        showError(`Unable to reach the studio: ${e.message}`);
    }
}

async function submit(path, body) {
    $('generate-campaign').disabled = true;
    $('generate-videos').disabled = true;
    let failure = null;
    try {
        const response = await fetch(path, {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify(body),
        });
        const payload = await response.json();
        if (!response.ok) failure = payload.error;
    } catch (e) {
        failure = `Something went wrong: ${e.message}`;
    } finally {
        await refresh();
    }
    if (failure) showError(failure);
}

function connectProgress() {
    const ws = new WebSocket(`${location.protocol === 'https:' ? 'wss' : 'ws'}://${location.host}/ws`);
    ws.onmessage = (message) => {
        const event = JSON.parse(message.data);
        if (event.type === 'update') {
            $('progress-box').hidden = false;
            $('progress-bar').style.width = `${event.percent}%`;
            $('progress-label').textContent = event.label;
        } else {
            $('progress-box').hidden = true;
        }
    };
    ws.onclose = () => setTimeout(connectProgress, 2000);
}

$('num_scenes').oninput = () => $('num_scenes_value').textContent = $('num_scenes').value;
$('campaign_id').oninput = () => idEdited = true;
$('generate-campaign').onclick = () => {
    idEdited = false;
    submit('/api/campaign', {
        business_type: $('business_type').value,
        campaign_theme: $('campaign_theme').value,
        character_age: $('character_age').value,
        character_gender: $('character_gender').value,
        character_ethnicity: $('character_ethnicity').value,
        num_scenes: Number($('num_scenes').value),
    });
};
$('generate-videos').onclick = () => submit('/api/videos', {
    campaign_id: $('campaign_id').value,
    business_name: $('business_name').value,
    phone_number: $('phone_number').value,
    website: $('website').value,
});

loadForm().then(refresh);
connectProgress();
</script>
</body>
</html>
"###;
